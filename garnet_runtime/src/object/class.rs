//! Class nodes.
//!
//! One representation covers the four node kinds:
//!
//! ```text
//! ClassNode
//! ├── kind: ClassKind            (Class | Module | IncludeProxy | Singleton)
//! ├── superclass: Option<ClassId> (next link of the ancestor chain)
//! ├── klass: ClassId             (class of this node; the module for proxies)
//! ├── methods: TableRef<MethodTable>
//! ├── vars: Option<TableRef<VarTable>>
//! ├── flags: ClassFlags
//! └── name: Option<InternedString>
//! ```
//!
//! Classes, modules and singleton classes own their tables. Include proxies
//! only ever hold views of the included module's tables.

use super::ClassId;
use super::handle::{Owned, TableRef, View};
use super::method_table::MethodTable;
use super::var_table::VarTable;
use garnet_core::InternedString;

// =============================================================================
// Class Kind
// =============================================================================

/// The four kinds of node that can appear in an ancestor chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    /// Ordinary, instantiable class.
    Class,
    /// Mixin. Never placed in a chain directly; represented by proxies.
    Module,
    /// One inclusion of a module into a chain.
    IncludeProxy,
    /// Per-object (or per-class) class.
    Singleton,
}

impl ClassKind {
    /// Label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            ClassKind::Class => "Class",
            ClassKind::Module => "Module",
            ClassKind::IncludeProxy => "include proxy",
            ClassKind::Singleton => "singleton class",
        }
    }
}

// =============================================================================
// Class Flags
// =============================================================================

bitflags::bitflags! {
    /// State bits of a class node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ClassFlags: u32 {
        /// No further structural or method-table mutation is allowed.
        const FROZEN = 1 << 0;
        /// Superclass and tables are set up; shells from `allocate_shell`
        /// lack this until `initialize_copy` runs.
        const INITIALIZED = 1 << 1;
    }
}

// =============================================================================
// Class Node
// =============================================================================

/// A class, module, singleton class or include proxy.
#[derive(Debug)]
pub struct ClassNode {
    kind: ClassKind,
    superclass: Option<ClassId>,
    klass: ClassId,
    methods: TableRef<MethodTable>,
    vars: Option<TableRef<VarTable>>,
    flags: ClassFlags,
    name: Option<InternedString>,
}

impl ClassNode {
    /// A node that owns a freshly allocated method table.
    pub(crate) fn owning(
        kind: ClassKind,
        superclass: Option<ClassId>,
        klass: ClassId,
        methods: Owned<MethodTable>,
    ) -> Self {
        debug_assert!(kind != ClassKind::IncludeProxy);
        Self {
            kind,
            superclass,
            klass,
            methods: TableRef::Owned(methods),
            vars: None,
            flags: ClassFlags::INITIALIZED,
            name: None,
        }
    }

    /// A proxy for `module` whose tables alias the module's.
    pub(crate) fn include_proxy(
        module: ClassId,
        superclass: Option<ClassId>,
        methods: View<MethodTable>,
        vars: View<VarTable>,
    ) -> Self {
        Self {
            kind: ClassKind::IncludeProxy,
            superclass,
            klass: module,
            methods: TableRef::Viewed(methods),
            vars: Some(TableRef::Viewed(vars)),
            flags: ClassFlags::INITIALIZED,
            name: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    #[inline]
    pub fn is_class(&self) -> bool {
        self.kind == ClassKind::Class
    }

    #[inline]
    pub fn is_module(&self) -> bool {
        self.kind == ClassKind::Module
    }

    #[inline]
    pub fn is_singleton(&self) -> bool {
        self.kind == ClassKind::Singleton
    }

    #[inline]
    pub fn is_include_proxy(&self) -> bool {
        self.kind == ClassKind::IncludeProxy
    }

    /// Next link of the ancestor chain.
    #[inline]
    pub fn superclass(&self) -> Option<ClassId> {
        self.superclass
    }

    /// The node's own class. For include proxies this is the module the
    /// proxy stands for.
    #[inline]
    pub fn klass(&self) -> ClassId {
        self.klass
    }

    /// The module an include proxy represents.
    #[inline]
    pub fn included_module(&self) -> Option<ClassId> {
        match self.kind {
            ClassKind::IncludeProxy => Some(self.klass),
            _ => None,
        }
    }

    /// Read-only handle to the method table (owned or aliased).
    #[inline]
    pub fn methods(&self) -> View<MethodTable> {
        self.methods.view()
    }

    /// Owning handle, absent on include proxies.
    #[inline]
    pub fn methods_owner(&self) -> Option<&Owned<MethodTable>> {
        self.methods.owner()
    }

    #[inline]
    pub fn vars(&self) -> Option<View<VarTable>> {
        self.vars.as_ref().map(TableRef::view)
    }

    #[inline]
    pub fn vars_owner(&self) -> Option<&Owned<VarTable>> {
        self.vars.as_ref().and_then(TableRef::owner)
    }

    #[inline]
    pub fn flags(&self) -> ClassFlags {
        self.flags
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.flags.contains(ClassFlags::FROZEN)
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.flags.contains(ClassFlags::INITIALIZED)
    }

    #[inline]
    pub fn name(&self) -> Option<&InternedString> {
        self.name.as_ref()
    }

    // =========================================================================
    // Mutation (object space only)
    // =========================================================================

    pub(crate) fn set_superclass(&mut self, superclass: Option<ClassId>) {
        self.superclass = superclass;
    }

    pub(crate) fn set_klass(&mut self, klass: ClassId) {
        self.klass = klass;
    }

    pub(crate) fn set_owned_vars(&mut self, vars: Owned<VarTable>) {
        debug_assert!(!self.is_include_proxy());
        self.vars = Some(TableRef::Owned(vars));
    }

    pub(crate) fn add_flags(&mut self, flags: ClassFlags) {
        self.flags |= flags;
    }

    pub(crate) fn remove_flags(&mut self, flags: ClassFlags) {
        self.flags.remove(flags);
    }

    pub(crate) fn set_name(&mut self, name: InternedString) {
        self.name = Some(name);
    }
}
