//! In-memory caches of parsed translation units.
//!
//! A [`TuCache`] keeps one live translation unit per file and decides, for
//! every request, whether the unit can be reused as-is, must be reparsed
//! incrementally against the new buffer text, or must be thrown away because
//! the file's compiler flags changed. [`TuCaches`] pairs the latency-tuned
//! completion cache with the accuracy-tuned navigation cache.

#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod pair;
pub mod profile;

pub use cache::{CacheStats, TuCache};
pub use error::CacheError;
pub use pair::TuCaches;
pub use profile::CacheProfile;
