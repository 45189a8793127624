//! Shared value types used across the ccx code-intelligence workspace.
//!
//! This crate provides the cache-validity [`Fingerprint`], the editor's
//! [`RevisionToken`], source [`Location`] records, and lexical path helpers.

#![warn(missing_docs)]

pub mod fingerprint;
pub mod location;
pub mod path;
pub mod revision;

pub use fingerprint::Fingerprint;
pub use location::Location;
pub use path::{absolutize, normalize};
pub use revision::RevisionToken;
