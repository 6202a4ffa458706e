//! Read-only traversals of the class graph.
//!
//! Every query walks superclass links with `SuperChain` and never mutates
//! the space, so results can be recomputed at any time.

use super::class::{ClassKind, ClassNode};
use super::method_table::{MethodTable, Visibility};
use super::space::ObjectSpace;
use super::symbol_map::SymbolMap;
use super::value::Value;
use super::ClassId;
use garnet_core::{Arena, GarnetError, GarnetResult, InternedString};
use smallvec::SmallVec;

/// Ordered list of ancestors, nearest first.
pub type Ancestors = SmallVec<[ClassId; 8]>;

// =============================================================================
// Superclass Walk
// =============================================================================

/// Iterator over superclass links, starting at the given node.
pub struct SuperChain<'a> {
    nodes: &'a Arena<ClassNode>,
    next: Option<ClassId>,
}

impl<'a> SuperChain<'a> {
    pub(crate) fn new(nodes: &'a Arena<ClassNode>, start: Option<ClassId>) -> Self {
        Self { nodes, next: start }
    }
}

impl<'a> Iterator for SuperChain<'a> {
    type Item = (ClassId, &'a ClassNode);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = &self.nodes[id];
        self.next = node.superclass();
        Some((id, node))
    }
}

// =============================================================================
// Method Filters
// =============================================================================

/// Visibility filter applied to enumerated method names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodFilter {
    PublicOnly,
    ProtectedOnly,
    PrivateOnly,
    AllButPrivate,
}

impl MethodFilter {
    #[inline]
    pub fn accepts(self, visibility: Visibility) -> bool {
        match self {
            MethodFilter::PublicOnly => visibility == Visibility::Public,
            MethodFilter::ProtectedOnly => visibility == Visibility::Protected,
            MethodFilter::PrivateOnly => visibility == Visibility::Private,
            MethodFilter::AllButPrivate => visibility != Visibility::Private,
        }
    }
}

/// First slot state seen per selector. `None` marks a tombstone.
#[derive(Default)]
struct MethodCollector {
    seen: SymbolMap<Option<Visibility>>,
}

impl MethodCollector {
    fn collect(&mut self, table: &MethodTable) {
        for (name, slot) in table.iter() {
            if !self.seen.contains(name) {
                self.seen.insert(name.clone(), slot.visibility());
            }
        }
    }

    fn finish(self, filter: MethodFilter) -> Vec<InternedString> {
        self.seen
            .iter()
            .filter_map(|(name, visibility)| match visibility {
                Some(visibility) if filter.accepts(*visibility) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }
}

// =============================================================================
// Queries
// =============================================================================

impl ObjectSpace {
    /// The receiver followed by its ancestors, nearest first. Singleton
    /// classes are left out; proxies report their module.
    pub fn ancestors(&self, class: ClassId) -> Ancestors {
        self.superclass_chain(Some(class))
            .filter_map(|(id, node)| match node.kind() {
                ClassKind::Singleton => None,
                ClassKind::IncludeProxy => Some(node.klass()),
                ClassKind::Class | ClassKind::Module => Some(id),
            })
            .collect()
    }

    /// Modules included anywhere above the receiver, nearest first.
    pub fn included_modules(&self, class: ClassId) -> Ancestors {
        self.superclass_chain(self.node(class).superclass())
            .filter_map(|(_, node)| node.included_module())
            .collect()
    }

    /// Whether `module` is included in `class` or one of its ancestors.
    pub fn includes_module(&self, class: ClassId, module: ClassId) -> GarnetResult<bool> {
        self.expect_module(module)?;
        Ok(self.included_modules(class).contains(&module))
    }

    /// Names of methods visible from `class` that pass `filter`, in
    /// first-seen order. Nearer definitions shadow farther ones and
    /// tombstones hide the name entirely.
    pub fn method_names(
        &self,
        class: ClassId,
        include_ancestors: bool,
        filter: MethodFilter,
    ) -> Vec<InternedString> {
        let mut collector = MethodCollector::default();
        if include_ancestors {
            for (id, _) in self.superclass_chain(Some(class)) {
                collector.collect(self.method_table_of(id));
            }
        } else {
            collector.collect(self.method_table_of(class));
        }
        collector.finish(filter)
    }

    pub fn instance_methods(&self, class: ClassId, recur: bool) -> Vec<InternedString> {
        self.method_names(class, recur, MethodFilter::AllButPrivate)
    }

    pub fn public_instance_methods(&self, class: ClassId, recur: bool) -> Vec<InternedString> {
        self.method_names(class, recur, MethodFilter::PublicOnly)
    }

    pub fn protected_instance_methods(&self, class: ClassId, recur: bool) -> Vec<InternedString> {
        self.method_names(class, recur, MethodFilter::ProtectedOnly)
    }

    pub fn private_instance_methods(&self, class: ClassId, recur: bool) -> Vec<InternedString> {
        self.method_names(class, recur, MethodFilter::PrivateOnly)
    }

    /// Non-private methods defined on a value's singleton class. With
    /// `all`, also those of modules included into it (and of further
    /// singleton classes above it), up to the first ordinary class.
    pub fn singleton_methods(&self, value: &Value, all: bool) -> Vec<InternedString> {
        let mut collector = MethodCollector::default();
        let klass = self.class_of(value);
        let mut cursor = Some(klass);

        let node = self.node(klass);
        if node.is_singleton() {
            collector.collect(self.method_table_of(klass));
            cursor = node.superclass();
        }
        if all {
            for (id, node) in self.superclass_chain(cursor) {
                if !node.is_singleton() && !node.is_include_proxy() {
                    break;
                }
                collector.collect(self.method_table_of(id));
            }
        }
        collector.finish(MethodFilter::AllButPrivate)
    }

    /// `TypeError` unless `module` is a module.
    pub(crate) fn expect_module(&self, module: ClassId) -> GarnetResult<()> {
        let kind = self.node(module).kind();
        if kind == ClassKind::Module {
            Ok(())
        } else {
            Err(GarnetError::type_error(format!(
                "wrong argument type {} (expected Module)",
                kind.label()
            )))
        }
    }
}
