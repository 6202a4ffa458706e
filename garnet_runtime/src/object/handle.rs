//! Owning and viewing handles for shared tables.
//!
//! A method table (or variable table) has exactly one owner: the class or
//! module that allocated it. Include proxies hold a `View` of the same
//! table. Only an `Owned` handle can produce a mutable borrow, so writing
//! through a proxy does not type-check.

use garnet_core::{Arena, Id};
use std::fmt;

/// The unique owning handle of a table. Deliberately not `Clone`.
pub struct Owned<T> {
    id: Id<T>,
}

impl<T> Owned<T> {
    pub(crate) fn new(id: Id<T>) -> Self {
        Self { id }
    }

    /// Arena index of the table.
    #[inline]
    pub fn id(&self) -> Id<T> {
        self.id
    }

    /// A read-only handle to the same table.
    #[inline]
    pub fn view(&self) -> View<T> {
        View { id: self.id }
    }

    #[inline]
    pub fn get<'a>(&self, arena: &'a Arena<T>) -> &'a T {
        &arena[self.id]
    }

    #[inline]
    pub fn get_mut<'a>(&self, arena: &'a mut Arena<T>) -> &'a mut T {
        &mut arena[self.id]
    }
}

/// A shared, read-only handle.
pub struct View<T> {
    id: Id<T>,
}

impl<T> View<T> {
    /// Arena index of the table.
    #[inline]
    pub fn id(self) -> Id<T> {
        self.id
    }

    #[inline]
    pub fn get(self, arena: &Arena<T>) -> &T {
        &arena[self.id]
    }
}

impl<T> Copy for View<T> {}

impl<T> Clone for View<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for View<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for View<T> {}

impl<T> fmt::Debug for Owned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Owned({:?})", self.id)
    }
}

impl<T> fmt::Debug for View<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "View({:?})", self.id)
    }
}

/// How a class node refers to a table.
#[derive(Debug)]
pub enum TableRef<T> {
    /// The node allocated the table and may mutate it.
    Owned(Owned<T>),
    /// The node aliases a table owned elsewhere.
    Viewed(View<T>),
}

impl<T> TableRef<T> {
    /// Read-only handle, whichever way the table is held.
    #[inline]
    pub fn view(&self) -> View<T> {
        match self {
            TableRef::Owned(owned) => owned.view(),
            TableRef::Viewed(view) => *view,
        }
    }

    /// The owning handle, if this node owns the table.
    #[inline]
    pub fn owner(&self) -> Option<&Owned<T>> {
        match self {
            TableRef::Owned(owned) => Some(owned),
            TableRef::Viewed(_) => None,
        }
    }
}
