//! Request generations for cooperative cancellation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Returned by [`RequestTicket::checkpoint`] once a newer request exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("request superseded")]
pub struct Cancelled;

/// Monotonic generation counter for one class of requests.
///
/// Clones share the same counter.
#[derive(Debug, Default, Clone)]
pub struct GenerationCounter {
    live: Arc<AtomicU64>,
}

impl GenerationCounter {
    /// Creates a counter at generation 0; the first ticket is generation 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new request, superseding every ticket issued before.
    ///
    /// Call this on the requesting side before the task is queued, so a
    /// request that is still waiting in the queue already sees itself as
    /// stale.
    pub fn issue(&self) -> RequestTicket {
        let generation = self.live.fetch_add(1, Ordering::AcqRel).wrapping_add(1);
        RequestTicket {
            generation,
            live: Arc::clone(&self.live),
        }
    }

    /// Returns the generation of the newest ticket.
    pub fn current(&self) -> u64 {
        self.live.load(Ordering::Acquire)
    }
}

/// One request's claim to be the newest of its class.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    generation: u64,
    live: Arc<AtomicU64>,
}

impl RequestTicket {
    /// Returns the generation this ticket was issued at.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns `true` while no newer ticket has been issued.
    pub fn is_current(&self) -> bool {
        self.live.load(Ordering::Acquire) == self.generation
    }

    /// Fails with [`Cancelled`] once the request has been superseded.
    pub fn checkpoint(&self) -> Result<(), Cancelled> {
        if self.is_current() {
            Ok(())
        } else {
            Err(Cancelled)
        }
    }
}
