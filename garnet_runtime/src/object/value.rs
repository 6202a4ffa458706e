//! Runtime values as seen by the object model.
//!
//! Immediates (`nil`, booleans, fixnums, symbols) carry their payload
//! inline and have fixed classes. Heap instances and class nodes are
//! referred to by arena handle.

use super::var_table::VarTable;
use super::{ClassId, ObjectId};
use garnet_core::InternedString;

/// A runtime value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Nil,
    True,
    False,
    Fixnum(i64),
    Symbol(InternedString),
    /// A heap instance.
    Object(ObjectId),
    /// A class, module or singleton class used as a value.
    Class(ClassId),
}

impl Value {
    #[inline]
    pub fn bool(b: bool) -> Self {
        if b { Value::True } else { Value::False }
    }

    /// True for values whose representation has no heap header.
    #[inline]
    pub fn is_immediate(&self) -> bool {
        !matches!(self, Value::Object(_) | Value::Class(_))
    }

    #[inline]
    pub fn as_class(&self) -> Option<ClassId> {
        match self {
            Value::Class(id) => Some(*id),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<ObjectId> {
        match self {
            Value::Object(id) => Some(*id),
            _ => None,
        }
    }
}

bitflags::bitflags! {
    /// Per-instance state bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ObjectFlags: u32 {
        /// Instance can no longer be mutated.
        const FROZEN = 1 << 0;
    }
}

/// A plain heap object.
#[derive(Debug, Clone)]
pub struct Instance {
    /// Direct class: a singleton class once one has been materialized.
    pub(crate) klass: ClassId,
    pub(crate) flags: ObjectFlags,
    pub(crate) ivars: VarTable,
}

impl Instance {
    pub(crate) fn new(klass: ClassId) -> Self {
        Self {
            klass,
            flags: ObjectFlags::empty(),
            ivars: VarTable::new(),
        }
    }

    /// Direct class pointer.
    #[inline]
    pub fn klass(&self) -> ClassId {
        self.klass
    }

    #[inline]
    pub fn flags(&self) -> ObjectFlags {
        self.flags
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.flags.contains(ObjectFlags::FROZEN)
    }

    #[inline]
    pub fn ivars(&self) -> &VarTable {
        &self.ivars
    }
}
