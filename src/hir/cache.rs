//! Generation-guarded caches.
//!
//! Every derived answer (uses clauses, dependency closures, ancestor chains,
//! unit file lookups) is cached in a [`GenerationCache`]. A cache remembers
//! the host generation it was filled under; the first call that presents a
//! newer generation clears the whole cache and adopts the new one.
//!
//! There is no per-entry dependency tracking: any modification anywhere in
//! the host advances the generation and drops everything.
//!
//! ```text
//! call(generation = 7)
//!     │
//!     ├─ cache.generation == 7 ──► lookup / compute / insert
//!     │
//!     └─ cache.generation <  7 ──► [write lock] clear, adopt 7 ──► lookup ...
//! ```

use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::deps::TransitiveDependencyResult;
use super::ids::DeclKey;
use super::inherit::InheritanceInfo;
use super::uses::UsesClause;
use crate::base::{FileId, UnitName};

// ============================================================================
// MODIFICATION TRACKER
// ============================================================================

/// The host's monotonically increasing modification counter.
#[derive(Debug, Default)]
pub struct ModificationTracker {
    generation: AtomicU64,
}

impl ModificationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Record a modification, returning the new generation.
    pub fn bump(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }
}

// ============================================================================
// GENERATION CACHE
// ============================================================================

/// Counters exposed for diagnostics and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Number of times the cache was cleared because the generation moved.
    pub invalidations: u64,
    pub entries: usize,
}

/// A concurrent map whose entries are valid for exactly one generation.
///
/// The only write-locked sections are the compare-and-clear on a generation
/// change and the insertion of a freshly computed value. Computation runs
/// with no lock held, so computing one entry may consult other caches (or
/// this one) freely.
pub struct GenerationCache<K, V> {
    name: &'static str,
    inner: RwLock<CacheInner<K, V>>,
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
}

struct CacheInner<K, V> {
    generation: Option<u64>,
    entries: FxHashMap<K, V>,
}

impl<K, V> GenerationCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: RwLock::new(CacheInner {
                generation: None,
                entries: FxHashMap::default(),
            }),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
        }
    }

    /// Return the cached value for `key` under `generation`, computing and
    /// storing it on a miss.
    ///
    /// A caller holding an older generation than the cache gets a freshly
    /// computed value that is not stored.
    pub fn get_or_compute(&self, generation: u64, key: &K, compute: impl FnOnce() -> V) -> V {
        self.sync(generation);

        {
            let inner = self.inner.read();
            if inner.generation == Some(generation) {
                if let Some(value) = inner.entries.get(key) {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return value.clone();
                }
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = compute();

        let mut inner = self.inner.write();
        if inner.generation == Some(generation) {
            // Another thread may have raced us to the same key; keep theirs.
            return inner
                .entries
                .entry(key.clone())
                .or_insert(value)
                .clone();
        }
        value
    }

    /// Look up without computing.
    pub fn get(&self, generation: u64, key: &K) -> Option<V> {
        self.sync(generation);
        let inner = self.inner.read();
        if inner.generation != Some(generation) {
            return None;
        }
        inner.entries.get(key).cloned()
    }

    /// Compare the cache's generation with `generation`; clear and adopt it
    /// if it is newer.
    fn sync(&self, generation: u64) {
        {
            let inner = self.inner.read();
            if inner.generation.is_some_and(|seen| seen >= generation) {
                return;
            }
        }

        let mut inner = self.inner.write();
        if inner.generation.is_some_and(|seen| seen >= generation) {
            return;
        }
        if inner.generation.is_some() {
            self.invalidations.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(
                "[CACHE] {}: generation {:?} -> {}, dropping {} entries",
                self.name,
                inner.generation,
                generation,
                inner.entries.len()
            );
        }
        inner.entries.clear();
        inner.generation = Some(generation);
    }

    /// Drop every entry without changing the adopted generation.
    pub fn clear(&self) {
        self.inner.write().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

impl<K, V> std::fmt::Debug for GenerationCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("GenerationCache")
            .field("name", &self.name)
            .field("generation", &inner.generation)
            .field("entries", &inner.entries.len())
            .finish()
    }
}

// ============================================================================
// CACHE SERVICE
// ============================================================================

/// All caches used by the resolvers, passed by reference into every call.
#[derive(Debug)]
pub struct CacheService {
    pub(crate) uses: GenerationCache<FileId, Arc<UsesClause>>,
    pub(crate) unit_files: GenerationCache<(UnitName, bool), Option<FileId>>,
    pub(crate) dependencies: GenerationCache<(FileId, usize), Arc<TransitiveDependencyResult>>,
    pub(crate) inheritance: GenerationCache<DeclKey, Arc<InheritanceInfo>>,
}

impl Default for CacheService {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheService {
    pub fn new() -> Self {
        Self {
            uses: GenerationCache::new("uses"),
            unit_files: GenerationCache::new("unit_files"),
            dependencies: GenerationCache::new("dependencies"),
            inheritance: GenerationCache::new("inheritance"),
        }
    }

    /// Drop all entries in all caches.
    pub fn clear(&self) {
        self.uses.clear();
        self.unit_files.clear();
        self.dependencies.clear();
        self.inheritance.clear();
    }

    pub fn uses_stats(&self) -> CacheStats {
        self.uses.stats()
    }

    pub fn unit_file_stats(&self) -> CacheStats {
        self.unit_files.stats()
    }

    pub fn dependency_stats(&self) -> CacheStats {
        self.dependencies.stats()
    }

    pub fn inheritance_stats(&self) -> CacheStats {
        self.inheritance.stats()
    }
}
