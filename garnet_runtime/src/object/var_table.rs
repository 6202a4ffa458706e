//! Variable storage for classes, modules and instances.

use super::symbol_map::SymbolMap;
use super::value::Value;
use garnet_core::InternedString;

/// Named value slots.
///
/// Class-level tables are shared with include proxies the same way method
/// tables are. Singleton classes keep their attached-object back-reference
/// here under `ATTACHED_SLOT`.
#[derive(Debug, Clone, Default)]
pub struct VarTable {
    slots: SymbolMap<Value>,
}

impl VarTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, name: &InternedString) -> Option<&Value> {
        self.slots.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &InternedString) -> bool {
        self.slots.contains(name)
    }

    pub fn set(&mut self, name: InternedString, value: Value) -> Option<Value> {
        self.slots.insert(name, value)
    }

    pub fn remove(&mut self, name: &InternedString) -> Option<Value> {
        self.slots.remove(name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&InternedString, &Value)> {
        self.slots.iter()
    }
}
