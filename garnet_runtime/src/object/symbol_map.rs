//! Insertion-ordered map keyed by interned names.
//!
//! Backs both method tables and variable tables. Lookups go through an
//! `FxHashMap` index; iteration follows first-insertion order so that
//! reflection results are deterministic.

use garnet_core::InternedString;
use rustc_hash::FxHashMap;

/// Ordered `InternedString -> V` map.
#[derive(Debug, Clone)]
pub struct SymbolMap<V> {
    entries: Vec<(InternedString, V)>,
    index: FxHashMap<InternedString, usize>,
}

impl<V> SymbolMap<V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn get(&self, name: &InternedString) -> Option<&V> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    #[inline]
    pub fn contains(&self, name: &InternedString) -> bool {
        self.index.contains_key(name)
    }

    /// Insert or overwrite. An overwritten entry keeps its original position.
    pub fn insert(&mut self, name: InternedString, value: V) -> Option<V> {
        match self.index.get(&name) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Remove an entry, preserving the order of the rest.
    pub fn remove(&mut self, name: &InternedString) -> Option<V> {
        let position = self.index.remove(name)?;
        let (_, value) = self.entries.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(value)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&InternedString, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl<V> Default for SymbolMap<V> {
    fn default() -> Self {
        Self::new()
    }
}
