//! Conversion of engine completion results into editor completion items.
//!
//! [`format`] turns one [`CompletionResult`](ccx_engine::CompletionResult)
//! into a [`CompletionItem`] with display word, menu text, detail text and an
//! insertable snippet, or rejects it. Matching against the user's filter text
//! happens before any snippet is built.

#![warn(missing_docs)]

pub mod item;
pub mod matcher;
pub mod snippet;

pub use item::{format, CompletionItem, Rejection};
pub use matcher::{BuiltinMatcher, Matcher};
pub use snippet::placeholder;
