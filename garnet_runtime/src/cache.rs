//! Method-resolution cache invalidation hook.
//!
//! The dispatch cache itself lives outside the object model. The object
//! space only tells it when resolutions may have gone stale:
//!
//! - `invalidate_all` after an inclusion actually spliced a proxy
//! - `invalidate_method` after a method was defined, undefined or aliased
//!
//! Both calls happen before the mutating operation returns, so a caller
//! holding the `SharedObjectSpace` lock never releases it with a stale cache.

use garnet_core::InternedString;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Receiver of structural-change notifications.
pub trait MethodCacheInvalidator: Send + Sync {
    /// Drop every cached resolution.
    fn invalidate_all(&self);

    /// Drop cached resolutions of one selector.
    fn invalidate_method(&self, name: &InternedString);
}

/// Ignores all notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopInvalidator;

impl MethodCacheInvalidator for NoopInvalidator {
    #[inline]
    fn invalidate_all(&self) {}

    #[inline]
    fn invalidate_method(&self, _name: &InternedString) {}
}

// =============================================================================
// Counting Invalidator
// =============================================================================

/// Counts notifications and remembers invalidated selectors.
#[derive(Debug, Default)]
pub struct CountingInvalidator {
    full: AtomicU64,
    per_method: AtomicU64,
    names: Mutex<Vec<InternedString>>,
}

impl CountingInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `invalidate_all` calls.
    pub fn full_invalidations(&self) -> u64 {
        self.full.load(Ordering::Relaxed)
    }

    /// Number of `invalidate_method` calls.
    pub fn method_invalidations(&self) -> u64 {
        self.per_method.load(Ordering::Relaxed)
    }

    /// Selectors passed to `invalidate_method`, oldest first.
    pub fn invalidated_names(&self) -> Vec<InternedString> {
        self.names.lock().clone()
    }

    pub fn reset(&self) {
        self.full.store(0, Ordering::Relaxed);
        self.per_method.store(0, Ordering::Relaxed);
        self.names.lock().clear();
    }
}

impl MethodCacheInvalidator for CountingInvalidator {
    fn invalidate_all(&self) {
        self.full.fetch_add(1, Ordering::Relaxed);
    }

    fn invalidate_method(&self, name: &InternedString) {
        self.per_method.fetch_add(1, Ordering::Relaxed);
        self.names.lock().push(name.clone());
    }
}
