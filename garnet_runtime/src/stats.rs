//! Object model statistics.
//!
//! Counters of structural activity, kept when
//! `ObjectModelConfig::track_stats` is on.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters of class-graph mutations.
#[derive(Debug)]
pub struct ObjectModelStats {
    // =========================================================================
    // Creation
    // =========================================================================
    /// Classes created (boot, subclass and metaclass nodes).
    pub classes_created: AtomicU64,
    /// Modules created.
    pub modules_created: AtomicU64,
    /// Singleton classes materialized.
    pub singletons_created: AtomicU64,
    /// Singleton classes produced by `clone_singleton`.
    pub singletons_cloned: AtomicU64,

    // =========================================================================
    // Inclusion
    // =========================================================================
    /// Include proxies spliced into a chain.
    pub proxies_spliced: AtomicU64,
    /// Modules skipped because they were already in the chain.
    pub includes_skipped: AtomicU64,
    /// Full cache invalidations requested.
    pub cache_invalidations: AtomicU64,

    // =========================================================================
    // Methods
    // =========================================================================
    /// Method slots written (definitions, aliases, tombstones).
    pub methods_defined: AtomicU64,
}

/// Point-in-time copy of `ObjectModelStats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub classes_created: u64,
    pub modules_created: u64,
    pub singletons_created: u64,
    pub singletons_cloned: u64,
    pub proxies_spliced: u64,
    pub includes_skipped: u64,
    pub cache_invalidations: u64,
    pub methods_defined: u64,
}

impl ObjectModelStats {
    /// Create zeroed statistics.
    pub const fn new() -> Self {
        Self {
            classes_created: AtomicU64::new(0),
            modules_created: AtomicU64::new(0),
            singletons_created: AtomicU64::new(0),
            singletons_cloned: AtomicU64::new(0),
            proxies_spliced: AtomicU64::new(0),
            includes_skipped: AtomicU64::new(0),
            cache_invalidations: AtomicU64::new(0),
            methods_defined: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_class(&self) {
        self.classes_created.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_module(&self) {
        self.modules_created.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_singleton(&self) {
        self.singletons_created.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_singleton_clone(&self) {
        self.singletons_cloned.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_proxy(&self) {
        self.proxies_spliced.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_skipped_include(&self) {
        self.includes_skipped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_invalidation(&self) {
        self.cache_invalidations.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_method(&self) {
        self.methods_defined.fetch_add(1, Ordering::Relaxed);
    }

    /// Read all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            classes_created: self.classes_created.load(Ordering::Relaxed),
            modules_created: self.modules_created.load(Ordering::Relaxed),
            singletons_created: self.singletons_created.load(Ordering::Relaxed),
            singletons_cloned: self.singletons_cloned.load(Ordering::Relaxed),
            proxies_spliced: self.proxies_spliced.load(Ordering::Relaxed),
            includes_skipped: self.includes_skipped.load(Ordering::Relaxed),
            cache_invalidations: self.cache_invalidations.load(Ordering::Relaxed),
            methods_defined: self.methods_defined.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.classes_created.store(0, Ordering::Relaxed);
        self.modules_created.store(0, Ordering::Relaxed);
        self.singletons_created.store(0, Ordering::Relaxed);
        self.singletons_cloned.store(0, Ordering::Relaxed);
        self.proxies_spliced.store(0, Ordering::Relaxed);
        self.includes_skipped.store(0, Ordering::Relaxed);
        self.cache_invalidations.store(0, Ordering::Relaxed);
        self.methods_defined.store(0, Ordering::Relaxed);
    }

    /// Print a summary to stderr.
    pub fn print_summary(&self) {
        let s = self.snapshot();
        eprintln!("=== Object Model Statistics ===");
        eprintln!(
            "Created: {} classes, {} modules, {} singletons ({} cloned)",
            s.classes_created, s.modules_created, s.singletons_created, s.singletons_cloned
        );
        eprintln!(
            "Includes: {} proxies spliced, {} skipped",
            s.proxies_spliced, s.includes_skipped
        );
        eprintln!(
            "Methods: {} defined, {} cache invalidations",
            s.methods_defined, s.cache_invalidations
        );
    }
}

impl Default for ObjectModelStats {
    fn default() -> Self {
        Self::new()
    }
}
