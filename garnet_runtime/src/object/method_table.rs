//! Per-class method storage.
//!
//! A `MethodTable` maps selectors to `MethodSlot`s:
//! - absent: lookup continues in the next ancestor
//! - `Undefined`: a tombstone; lookup stops and the method is unavailable
//! - `Method`: a record carrying the body, its visibility and the class
//!   that defined it
//!
//! Tables are arena-allocated. Include proxies alias the table of the
//! module they represent, so a `MethodTable`'s arena index doubles as the
//! identity of "this module" during inclusion.

use super::ClassId;
use super::symbol_map::SymbolMap;
use garnet_core::InternedString;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// Visibility
// =============================================================================

/// Call-site visibility of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

// =============================================================================
// Method Bodies
// =============================================================================

/// What a method does when invoked. Opaque to the object model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodKind {
    /// Builtin implemented by the host, with its declared arity.
    Native { arity: i32 },
    /// Compiled code object, by index in the code registry.
    Compiled { code: u32 },
    /// Generated reader for an instance variable.
    AttrReader { ivar: InternedString },
    /// Generated writer for an instance variable.
    AttrWriter { ivar: InternedString },
}

/// Shared executable unit.
///
/// Cloning shares the body; `same_body` tells whether two records execute
/// the same unit (e.g. after a singleton class was cloned).
#[derive(Clone)]
pub struct MethodBody {
    inner: Arc<MethodKind>,
}

impl MethodBody {
    pub fn new(kind: MethodKind) -> Self {
        Self {
            inner: Arc::new(kind),
        }
    }

    pub fn native(arity: i32) -> Self {
        Self::new(MethodKind::Native { arity })
    }

    pub fn compiled(code: u32) -> Self {
        Self::new(MethodKind::Compiled { code })
    }

    pub fn attr_reader(ivar: InternedString) -> Self {
        Self::new(MethodKind::AttrReader { ivar })
    }

    pub fn attr_writer(ivar: InternedString) -> Self {
        Self::new(MethodKind::AttrWriter { ivar })
    }

    #[inline]
    pub fn kind(&self) -> &MethodKind {
        &self.inner
    }

    /// True if both handles point at the same executable unit.
    #[inline]
    pub fn same_body(&self, other: &MethodBody) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for MethodBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

// =============================================================================
// Method Slots
// =============================================================================

/// A defined method.
#[derive(Debug, Clone)]
pub struct MethodEntry {
    pub body: MethodBody,
    pub visibility: Visibility,
    /// Class whose table the method was defined in.
    pub origin: ClassId,
}

/// Contents of a method table slot.
#[derive(Debug, Clone)]
pub enum MethodSlot {
    /// Explicitly undefined; hides any inherited definition.
    Undefined,
    Method(MethodEntry),
}

impl MethodSlot {
    /// Visibility of a defined method, `None` for a tombstone.
    #[inline]
    pub fn visibility(&self) -> Option<Visibility> {
        match self {
            MethodSlot::Undefined => None,
            MethodSlot::Method(entry) => Some(entry.visibility),
        }
    }

    #[inline]
    pub fn entry(&self) -> Option<&MethodEntry> {
        match self {
            MethodSlot::Undefined => None,
            MethodSlot::Method(entry) => Some(entry),
        }
    }

    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, MethodSlot::Undefined)
    }
}

// =============================================================================
// Method Table
// =============================================================================

/// Selector to slot mapping for one class or module.
#[derive(Debug, Clone, Default)]
pub struct MethodTable {
    slots: SymbolMap<MethodSlot>,
}

impl MethodTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, name: &InternedString) -> Option<&MethodSlot> {
        self.slots.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &InternedString) -> bool {
        self.slots.contains(name)
    }

    /// Store a slot, returning whatever it replaced.
    pub fn insert(&mut self, name: InternedString, slot: MethodSlot) -> Option<MethodSlot> {
        self.slots.insert(name, slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&InternedString, &MethodSlot)> {
        self.slots.iter()
    }

    /// Fresh table with the same selectors whose records now originate
    /// from `origin`. Bodies and visibilities are shared; tombstones are
    /// copied as tombstones.
    pub fn rebased(&self, origin: ClassId) -> MethodTable {
        let mut table = MethodTable::new();
        for (name, slot) in self.iter() {
            let copied = match slot {
                MethodSlot::Undefined => MethodSlot::Undefined,
                MethodSlot::Method(entry) => MethodSlot::Method(MethodEntry {
                    body: entry.body.clone(),
                    visibility: entry.visibility,
                    origin,
                }),
            };
            table.insert(name.clone(), copied);
        }
        table
    }
}
