//! The completion and navigation caches as one unit of ownership.

use std::path::Path;

use ccx_engine::AnalysisEngine;

use crate::cache::TuCache;
use crate::profile::CacheProfile;

/// Both caches of a service, each with its own engine handle.
///
/// The caches never share units: invalidating one leaves the other alone.
/// Only [`remove_file`](Self::remove_file) touches both.
pub struct TuCaches<E: AnalysisEngine> {
    /// Latency-tuned units for completion.
    pub completion: TuCache<E>,
    /// Full-detail units for go-to-definition.
    pub navigation: TuCache<E>,
}

impl<E: AnalysisEngine> TuCaches<E> {
    /// Creates both caches from two engine handles.
    pub fn new(completion_engine: E, navigation_engine: E) -> Self {
        Self {
            completion: TuCache::new(completion_engine, CacheProfile::Completion),
            navigation: TuCache::new(navigation_engine, CacheProfile::Navigation),
        }
    }

    /// Sets whether new completion units get a warm-up reparse.
    pub fn with_warm_reparse(mut self, enabled: bool) -> Self {
        self.completion = self.completion.with_warm_reparse(enabled);
        self
    }

    /// Evicts `path` from both caches. Returns whether either held it.
    pub fn remove_file(&mut self, path: &Path) -> bool {
        let in_completion = self.completion.remove(path);
        let in_navigation = self.navigation.remove(path);
        in_completion || in_navigation
    }
}
