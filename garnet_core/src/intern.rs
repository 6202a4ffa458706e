//! Symbol interning.
//!
//! Method selectors and variable names are interned once and compared by
//! pointer afterwards. Two `InternedString`s are equal iff they came from
//! the same interner entry, so hashing and equality never touch the bytes.

use parking_lot::RwLock;
use rustc_hash::FxHashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

/// An interned, immutable name.
#[derive(Clone)]
pub struct InternedString {
    inner: Arc<str>,
}

impl InternedString {
    /// The interned text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Address of the shared allocation; stable for the interner's lifetime.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.inner.as_ptr()
    }
}

impl PartialEq for InternedString {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for InternedString {}

impl Hash for InternedString {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.as_ptr() as usize).hash(state);
    }
}

impl fmt::Debug for InternedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.as_str())
    }
}

impl fmt::Display for InternedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deduplicating string table.
#[derive(Default)]
pub struct StringInterner {
    strings: RwLock<FxHashSet<Arc<str>>>,
}

impl StringInterner {
    /// Create an empty interner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the canonical entry for `text`, creating it on first use.
    pub fn intern(&self, text: &str) -> InternedString {
        if let Some(existing) = self.strings.read().get(text) {
            return InternedString {
                inner: existing.clone(),
            };
        }

        let mut strings = self.strings.write();
        // Another writer may have won the race between the two locks.
        if let Some(existing) = strings.get(text) {
            return InternedString {
                inner: existing.clone(),
            };
        }
        let inner: Arc<str> = Arc::from(text);
        strings.insert(inner.clone());
        InternedString { inner }
    }

    /// Number of distinct strings.
    pub fn len(&self) -> usize {
        self.strings.read().len()
    }

    /// True if nothing has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

static GLOBAL_INTERNER: OnceLock<StringInterner> = OnceLock::new();

/// The process-wide interner.
pub fn global_interner() -> &'static StringInterner {
    GLOBAL_INTERNER.get_or_init(StringInterner::new)
}

/// Intern `text` in the process-wide interner.
#[inline]
pub fn intern(text: &str) -> InternedString {
    global_interner().intern(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_same_text_same_symbol() {
        let a = intern("initialize");
        let b = intern("initialize");
        assert_eq!(a, b);
        assert_eq!(a.as_ptr(), b.as_ptr());
    }

    #[test]
    fn test_different_text_different_symbol() {
        assert_ne!(intern("foo"), intern("bar"));
    }

    #[test]
    fn test_separate_interners_do_not_share_identity() {
        let first = StringInterner::new();
        let second = StringInterner::new();
        assert_ne!(first.intern("x"), second.intern("x"));
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn test_hash_follows_identity() {
        let mut set = HashSet::new();
        set.insert(intern("to_s"));
        set.insert(intern("to_s"));
        set.insert(intern("inspect"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_formatting() {
        let sym = intern("each");
        assert_eq!(sym.to_string(), "each");
        assert_eq!(format!("{:?}", sym), ":each");
    }

    #[test]
    fn test_concurrent_interning() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| intern("shared_name")))
            .collect();
        let symbols: Vec<InternedString> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(symbols.windows(2).all(|w| w[0] == w[1]));
    }
}
