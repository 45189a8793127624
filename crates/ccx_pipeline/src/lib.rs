//! A single-worker task queue with cooperative request cancellation.
//!
//! A [`Pipeline`] owns one OS thread and the state that thread works on.
//! Tasks run one at a time in submission order, so the state needs no locks.
//! Foreground callers use [`Pipeline::barrier`] or [`Pipeline::call`] to wait
//! for queued work before touching the state synchronously.
//!
//! Superseded requests are abandoned cooperatively: the caller issues a
//! [`RequestTicket`] from a [`GenerationCounter`] when the request arrives,
//! and the task checks the ticket at each expensive step. A newer request
//! makes every older ticket stale.

#![warn(missing_docs)]

pub mod error;
pub mod generation;
pub mod outcome;
pub mod pipeline;

pub use error::PipelineError;
pub use generation::{Cancelled, GenerationCounter, RequestTicket};
pub use outcome::{TaskError, TaskOutcome};
pub use pipeline::Pipeline;
