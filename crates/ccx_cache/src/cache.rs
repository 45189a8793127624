//! Per-file translation-unit cache with fingerprint invalidation.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ccx_common::{Fingerprint, RevisionToken};
use ccx_engine::{AnalysisEngine, TranslationUnit, UnsavedFile};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::CacheError;
use crate::profile::CacheProfile;

/// Counters of what the cache did, for logging and tests.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct CacheStats {
    /// Requests answered without any engine call.
    pub hits: u64,
    /// Incremental reparses of an existing unit, warm-up reparses included.
    pub reparses: u64,
    /// Fresh parses.
    pub parses: u64,
    /// Units discarded because their fingerprint changed.
    pub invalidations: u64,
    /// Units removed explicitly or after a failed reparse.
    pub evictions: u64,
}

struct CacheEntry<U> {
    fingerprint: Fingerprint,
    revision: RevisionToken,
    unit: U,
}

/// A cache of live translation units, at most one per file.
///
/// The cache owns its engine handle; every unit it holds was parsed with the
/// options of its [`CacheProfile`].
pub struct TuCache<E: AnalysisEngine> {
    engine: E,
    profile: CacheProfile,
    warm_reparse: bool,
    entries: HashMap<PathBuf, CacheEntry<E::Unit>>,
    stats: CacheStats,
}

impl<E: AnalysisEngine> TuCache<E> {
    /// Creates an empty cache driving `engine` with `profile`'s options.
    ///
    /// Completion caches reparse every new unit once right after creating it,
    /// which makes the first completion request much faster.
    pub fn new(engine: E, profile: CacheProfile) -> Self {
        Self {
            engine,
            profile,
            warm_reparse: profile == CacheProfile::Completion,
            entries: HashMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// Overrides whether new units get a warm-up reparse.
    pub fn with_warm_reparse(mut self, enabled: bool) -> Self {
        self.warm_reparse = enabled;
        self
    }

    /// Returns a unit for `path` that is valid for `fingerprint` and reflects
    /// `source`.
    ///
    /// A cached unit with the same fingerprint is reused: untouched when
    /// `revision` is unchanged, incrementally reparsed otherwise. A cached
    /// unit with a different fingerprint is released before a fresh parse.
    pub fn get_or_refresh(
        &mut self,
        path: &Path,
        fingerprint: &Fingerprint,
        revision: RevisionToken,
        source: &str,
    ) -> Result<&mut E::Unit, CacheError> {
        let unsaved = [UnsavedFile::new(path, source)];

        if let Some(entry) = self.entries.get(path) {
            if entry.fingerprint != *fingerprint {
                debug!(
                    "{} {} invalidated: {} -> {}",
                    self.profile,
                    path.display(),
                    entry.fingerprint,
                    fingerprint
                );
                self.entries.remove(path);
                self.stats.invalidations += 1;
            }
        }

        match self.entries.entry(path.to_path_buf()) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                if entry.revision == revision {
                    self.stats.hits += 1;
                    debug!("{} {} unit cached at {}", self.profile, path.display(), revision);
                } else {
                    if let Err(source) = entry.unit.reparse(&unsaved) {
                        occupied.remove();
                        self.stats.evictions += 1;
                        return Err(CacheError::Reparse {
                            path: path.to_path_buf(),
                            source,
                        });
                    }
                    entry.revision = revision;
                    self.stats.reparses += 1;
                    debug!("{} {} reparsed at {}", self.profile, path.display(), revision);
                }
                Ok(&mut occupied.into_mut().unit)
            }
            Entry::Vacant(vacant) => {
                let unit = parse_unit(
                    &mut self.engine,
                    self.profile,
                    self.warm_reparse,
                    &mut self.stats,
                    path,
                    fingerprint,
                    &unsaved,
                )?;
                let entry = vacant.insert(CacheEntry {
                    fingerprint: fingerprint.clone(),
                    revision,
                    unit,
                });
                Ok(&mut entry.unit)
            }
        }
    }

    /// Evicts and releases the unit for `path`. Returns whether one existed.
    pub fn remove(&mut self, path: &Path) -> bool {
        let removed = self.entries.remove(path).is_some();
        if removed {
            self.stats.evictions += 1;
            debug!("{} {} evicted", self.profile, path.display());
        }
        removed
    }

    /// Returns whether a unit for `path` is cached.
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    /// Returns the number of cached units.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no unit is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the fingerprint the unit for `path` was parsed with.
    pub fn fingerprint(&self, path: &Path) -> Option<&Fingerprint> {
        self.entries.get(path).map(|e| &e.fingerprint)
    }

    /// Returns this cache's profile.
    pub fn profile(&self) -> CacheProfile {
        self.profile
    }

    /// Returns the counters accumulated so far.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

/// Creates a unit, reparsing it once when `warm_reparse` is set.
fn parse_unit<E: AnalysisEngine>(
    engine: &mut E,
    profile: CacheProfile,
    warm_reparse: bool,
    stats: &mut CacheStats,
    path: &Path,
    fingerprint: &Fingerprint,
    unsaved: &[UnsavedFile],
) -> Result<E::Unit, CacheError> {
    let mut unit = engine
        .parse(path, fingerprint.args(), unsaved, profile.parse_options())
        .map_err(|source| CacheError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    stats.parses += 1;
    debug!("{profile} {} parsed, fingerprint {fingerprint}", path.display());

    if warm_reparse {
        match unit.reparse(unsaved) {
            Ok(()) => stats.reparses += 1,
            Err(e) => warn!("warm-up reparse of {} failed: {e}", path.display()),
        }
    }
    Ok(unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccx_engine::mock::{MockCall, MockEngine, MockHandle};

    fn fp(args: &[&str], dir: &str) -> Fingerprint {
        Fingerprint::new(args.iter().map(|s| s.to_string()).collect(), dir)
    }

    fn cache(profile: CacheProfile) -> (TuCache<MockEngine>, MockHandle) {
        let (engine, handle) = MockEngine::new();
        (TuCache::new(engine, profile), handle)
    }

    #[test]
    fn first_request_parses() {
        let (mut cache, handle) = cache(CacheProfile::Navigation);
        let path = Path::new("/p/a.c");
        cache
            .get_or_refresh(path, &fp(&["-DX"], "/p"), RevisionToken(1), "int x;")
            .unwrap();
        assert_eq!(handle.parse_count(), 1);
        assert_eq!(handle.reparse_count(), 0);
        assert!(cache.contains(path));
        assert_eq!(cache.stats().parses, 1);
    }

    #[test]
    fn parse_receives_profile_options_and_args() {
        let (mut cache, handle) = cache(CacheProfile::Navigation);
        cache
            .get_or_refresh(Path::new("/p/a.c"), &fp(&["-DX"], "/p"), RevisionToken(1), "src")
            .unwrap();
        assert_eq!(
            handle.calls()[0],
            MockCall::Parse {
                path: PathBuf::from("/p/a.c"),
                args: vec!["-DX".to_string()],
                options: CacheProfile::Navigation.parse_options(),
                text: Some("src".to_string()),
            }
        );
    }

    #[test]
    fn completion_profile_warms_up() {
        let (mut cache, handle) = cache(CacheProfile::Completion);
        cache
            .get_or_refresh(Path::new("/p/a.c"), &fp(&[], "/p"), RevisionToken(1), "")
            .unwrap();
        assert_eq!(handle.parse_count(), 1);
        assert_eq!(handle.reparse_count(), 1);
    }

    #[test]
    fn warm_up_can_be_disabled() {
        let (engine, handle) = MockEngine::new();
        let mut cache = TuCache::new(engine, CacheProfile::Completion).with_warm_reparse(false);
        cache
            .get_or_refresh(Path::new("/p/a.c"), &fp(&[], "/p"), RevisionToken(1), "")
            .unwrap();
        assert_eq!(handle.reparse_count(), 0);
    }

    #[test]
    fn unchanged_revision_is_a_pure_hit() {
        let (mut cache, handle) = cache(CacheProfile::Completion);
        let path = Path::new("/p/a.c");
        let fingerprint = fp(&["-DX"], "/p");
        cache.get_or_refresh(path, &fingerprint, RevisionToken(3), "a").unwrap();
        handle.clear_calls();

        cache.get_or_refresh(path, &fingerprint, RevisionToken(3), "a").unwrap();
        assert!(handle.calls().is_empty());
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn changed_revision_reparses_in_place() {
        let (mut cache, handle) = cache(CacheProfile::Navigation);
        let path = Path::new("/p/a.c");
        let fingerprint = fp(&["-DX"], "/p");
        cache.get_or_refresh(path, &fingerprint, RevisionToken(1), "old").unwrap();
        cache.get_or_refresh(path, &fingerprint, RevisionToken(2), "new").unwrap();

        assert_eq!(handle.parse_count(), 1);
        assert_eq!(handle.release_count(), 0);
        assert_eq!(
            handle.calls().last(),
            Some(&MockCall::Reparse {
                path: PathBuf::from("/p/a.c"),
                text: Some("new".to_string()),
            })
        );

        // The new revision is remembered.
        handle.clear_calls();
        cache.get_or_refresh(path, &fingerprint, RevisionToken(2), "new").unwrap();
        assert!(handle.calls().is_empty());
    }

    #[test]
    fn changed_fingerprint_releases_then_parses_once() {
        let (mut cache, handle) = cache(CacheProfile::Navigation);
        let path = Path::new("/p/a.c");
        cache.get_or_refresh(path, &fp(&["-DA"], "/p"), RevisionToken(1), "").unwrap();
        handle.clear_calls();

        cache.get_or_refresh(path, &fp(&["-DB"], "/p"), RevisionToken(1), "").unwrap();
        let calls = handle.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[0], MockCall::Release { .. }));
        assert!(matches!(calls[1], MockCall::Parse { .. }));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.fingerprint(path), Some(&fp(&["-DB"], "/p")));
        assert_eq!(cache.stats().invalidations, 1);
    }

    #[test]
    fn directory_change_invalidates() {
        let (mut cache, handle) = cache(CacheProfile::Navigation);
        let path = Path::new("/p/a.c");
        cache.get_or_refresh(path, &fp(&["-DA"], "/p"), RevisionToken(1), "").unwrap();
        cache.get_or_refresh(path, &fp(&["-DA"], "/q"), RevisionToken(1), "").unwrap();
        assert_eq!(handle.parse_count(), 2);
        assert_eq!(handle.release_count(), 1);
    }

    #[test]
    fn argument_order_matters() {
        let (mut cache, handle) = cache(CacheProfile::Navigation);
        let path = Path::new("/p/a.c");
        cache.get_or_refresh(path, &fp(&["-DA", "-DB"], "/p"), RevisionToken(1), "").unwrap();
        cache.get_or_refresh(path, &fp(&["-DB", "-DA"], "/p"), RevisionToken(1), "").unwrap();
        assert_eq!(handle.parse_count(), 2);
    }

    #[test]
    fn failed_parse_leaves_no_entry() {
        let (mut cache, handle) = cache(CacheProfile::Navigation);
        handle.fail_parse(Some("boom"));
        let path = Path::new("/p/a.c");
        let err = cache
            .get_or_refresh(path, &fp(&[], "/p"), RevisionToken(1), "")
            .map(|_| ())
            .unwrap_err();
        assert!(matches!(err, CacheError::Parse { .. }));
        assert!(!cache.contains(path));
    }

    #[test]
    fn failed_reparse_evicts() {
        let (mut cache, handle) = cache(CacheProfile::Navigation);
        let path = Path::new("/p/a.c");
        let fingerprint = fp(&[], "/p");
        cache.get_or_refresh(path, &fingerprint, RevisionToken(1), "").unwrap();
        handle.fail_reparse(Some("stale"));
        let err = cache
            .get_or_refresh(path, &fingerprint, RevisionToken(2), "")
            .map(|_| ())
            .unwrap_err();
        assert!(matches!(err, CacheError::Reparse { .. }));
        assert!(!cache.contains(path));
        assert_eq!(handle.release_count(), 1);
    }

    #[test]
    fn failed_warm_up_keeps_unit() {
        let (mut cache, handle) = cache(CacheProfile::Completion);
        handle.fail_reparse(Some("warm-up"));
        let path = Path::new("/p/a.c");
        cache.get_or_refresh(path, &fp(&[], "/p"), RevisionToken(1), "").unwrap();
        assert!(cache.contains(path));
    }

    #[test]
    fn remove_is_idempotent() {
        let (mut cache, handle) = cache(CacheProfile::Navigation);
        let path = Path::new("/p/a.c");
        cache.get_or_refresh(path, &fp(&[], "/p"), RevisionToken(1), "").unwrap();
        assert!(cache.remove(path));
        assert!(!cache.remove(path));
        assert_eq!(handle.release_count(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn files_are_independent() {
        let (mut cache, handle) = cache(CacheProfile::Navigation);
        let fingerprint = fp(&[], "/p");
        cache.get_or_refresh(Path::new("/p/a.c"), &fingerprint, RevisionToken(1), "").unwrap();
        cache.get_or_refresh(Path::new("/p/b.c"), &fingerprint, RevisionToken(1), "").unwrap();
        cache.remove(Path::new("/p/a.c"));
        assert!(cache.contains(Path::new("/p/b.c")));
        assert_eq!(cache.len(), 1);
        assert_eq!(handle.parse_count(), 2);
    }
}
