//! Typed arenas for long-lived runtime metadata.
//!
//! Class nodes, method tables and variable tables are created during class
//! definition and live until the runtime shuts down. They are stored in
//! arenas and referenced by stable `u32` indices:
//! - **Stable handles**: an `Id<T>` never moves, so re-linking a superclass
//!   pointer is a plain index store
//! - **No individual frees**: storage is released with the whole arena
//! - **Identity by index**: two handles name the same slot iff their
//!   indices are equal

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

// =============================================================================
// Typed ID
// =============================================================================

/// Index of an item stored in an `Arena<T>`.
///
/// The phantom parameter keeps ids of different arenas apart at compile time.
/// The trait impls are written by hand so that `Id<T>` is `Copy + Eq + Hash`
/// whatever `T` is.
pub struct Id<T> {
    index: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Placeholder that refers to no item.
    pub const INVALID: Self = Id {
        index: u32::MAX,
        _marker: PhantomData,
    };

    /// Wrap a raw index.
    #[inline]
    pub const fn new(index: u32) -> Self {
        Id {
            index,
            _marker: PhantomData,
        }
    }

    /// Raw index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Raw index as `usize`.
    #[inline]
    pub const fn as_usize(self) -> usize {
        self.index as usize
    }

    /// False for `Id::INVALID`.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.index != u32::MAX
    }
}

impl<T> Copy for Id<T> {}

impl<T> Clone for Id<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for Id<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.index.cmp(&other.index)
    }
}

impl<T> std::hash::Hash for Id<T> {
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.index)
        } else {
            f.write_str("#INVALID")
        }
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::INVALID
    }
}

// =============================================================================
// Arena
// =============================================================================

/// Append-only storage for items of one type.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    items: Vec<T>,
}

impl<T> Arena<T> {
    /// Create an empty arena.
    #[inline]
    pub fn new() -> Self {
        Arena { items: Vec::new() }
    }

    /// Create an empty arena with room for `capacity` items.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Arena {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Store `item` and return its handle.
    #[inline]
    pub fn alloc(&mut self, item: T) -> Id<T> {
        let index = self.items.len() as u32;
        assert!(index != u32::MAX, "arena exhausted");
        self.items.push(item);
        Id::new(index)
    }

    /// Item behind `id`, if it was allocated here.
    #[inline]
    pub fn get(&self, id: Id<T>) -> Option<&T> {
        self.items.get(id.as_usize())
    }

    /// Mutable item behind `id`, if it was allocated here.
    #[inline]
    pub fn get_mut(&mut self, id: Id<T>) -> Option<&mut T> {
        self.items.get_mut(id.as_usize())
    }

    /// True if `id` names an item of this arena.
    #[inline]
    pub fn contains(&self, id: Id<T>) -> bool {
        id.as_usize() < self.items.len()
    }

    /// Number of items.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items with their handles, in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (Id<T>, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (Id::new(i as u32), item))
    }

    /// Handle the next `alloc` will return.
    #[inline]
    pub fn next_id(&self) -> Id<T> {
        Id::new(self.items.len() as u32)
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<Id<T>> for Arena<T> {
    type Output = T;

    #[inline]
    fn index(&self, id: Id<T>) -> &Self::Output {
        &self.items[id.as_usize()]
    }
}

impl<T> IndexMut<Id<T>> for Arena<T> {
    #[inline]
    fn index_mut(&mut self, id: Id<T>) -> &mut Self::Output {
        &mut self.items[id.as_usize()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Node {
        value: i32,
    }

    #[test]
    fn test_alloc_returns_sequential_ids() {
        let mut arena: Arena<Node> = Arena::new();
        let a = arena.alloc(Node { value: 1 });
        let b = arena.alloc(Node { value: 2 });

        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(arena[a].value, 1);
        assert_eq!(arena[b].value, 2);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_index_mut_rewrites_in_place() {
        let mut arena: Arena<Node> = Arena::with_capacity(4);
        let id = arena.alloc(Node { value: 10 });
        arena[id].value = 11;
        assert_eq!(arena.get(id), Some(&Node { value: 11 }));
    }

    #[test]
    fn test_invalid_id() {
        let id: Id<Node> = Id::default();
        assert!(!id.is_valid());
        assert_eq!(format!("{:?}", id), "#INVALID");

        let arena: Arena<Node> = Arena::new();
        assert!(arena.get(id).is_none());
        assert!(!arena.contains(id));
    }

    #[test]
    fn test_next_id_matches_alloc() {
        let mut arena: Arena<Node> = Arena::new();
        let predicted = arena.next_id();
        let actual = arena.alloc(Node { value: 0 });
        assert_eq!(predicted, actual);
    }

    #[test]
    fn test_iter_in_allocation_order() {
        let mut arena: Arena<Node> = Arena::new();
        for value in 0..3 {
            arena.alloc(Node { value });
        }
        let values: Vec<i32> = arena.iter().map(|(_, n)| n.value).collect();
        assert_eq!(values, vec![0, 1, 2]);
    }
}
