//! Process-wide access to one object space.
//!
//! All structural mutation happens inside `with`, which holds the lock for
//! the whole closure. Cache invalidation runs inside the mutating call, so
//! it completes before the lock is released.

use super::space::ObjectSpace;
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable handle to an `ObjectSpace` behind a mutex.
#[derive(Clone)]
pub struct SharedObjectSpace {
    inner: Arc<Mutex<ObjectSpace>>,
}

impl SharedObjectSpace {
    pub fn new(space: ObjectSpace) -> Self {
        Self {
            inner: Arc::new(Mutex::new(space)),
        }
    }

    /// Run `f` with exclusive access to the space.
    #[inline]
    pub fn with<R>(&self, f: impl FnOnce(&mut ObjectSpace) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    /// Like `with`, giving up if another thread holds the lock.
    pub fn try_with<R>(&self, f: impl FnOnce(&mut ObjectSpace) -> R) -> Option<R> {
        let mut guard = self.inner.try_lock()?;
        Some(f(&mut guard))
    }
}

impl Default for SharedObjectSpace {
    fn default() -> Self {
        Self::new(ObjectSpace::new())
    }
}
