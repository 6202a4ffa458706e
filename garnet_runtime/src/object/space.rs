//! The object space: arenas for every class node, table and instance.
//!
//! `ObjectSpace::new` boots the core hierarchy:
//!
//! ```text
//! BasicObject < Object < Module < Class
//!
//! #<Class:BasicObject> < Class
//! #<Class:Object>      < #<Class:BasicObject>
//! #<Class:Module>      < #<Class:Object>
//! #<Class:Class>       < #<Class:Module>
//! ```
//!
//! followed by the classes of the immediates (`NilClass`, `TrueClass`,
//! `FalseClass`, `Integer`, `Symbol`), all direct subclasses of `Object`.

use super::class::{ClassFlags, ClassKind, ClassNode};
use super::handle::{Owned, View};
use super::introspect::SuperChain;
use super::method_table::MethodTable;
use super::value::{Instance, ObjectFlags, Value};
use super::var_table::VarTable;
use super::{ATTACHED_SLOT, ClassId, ObjectId};
use crate::cache::{MethodCacheInvalidator, NoopInvalidator};
use crate::config::ObjectModelConfig;
use crate::stats::ObjectModelStats;
use garnet_core::{Arena, GarnetError, GarnetResult, InternedString, intern};
use std::sync::Arc;

// =============================================================================
// Boot Classes
// =============================================================================

/// Handles of the classes created at boot.
#[derive(Debug, Clone, Copy, Default)]
pub struct BootClasses {
    pub basic_object: ClassId,
    pub object: ClassId,
    pub module: ClassId,
    /// The class of classes.
    pub class: ClassId,
    pub nil_class: ClassId,
    pub true_class: ClassId,
    pub false_class: ClassId,
    pub integer: ClassId,
    pub symbol: ClassId,
}

// =============================================================================
// Object Space
// =============================================================================

/// Owner of the class graph.
pub struct ObjectSpace {
    pub(crate) nodes: Arena<ClassNode>,
    pub(crate) method_tables: Arena<MethodTable>,
    pub(crate) var_tables: Arena<VarTable>,
    pub(crate) instances: Arena<Instance>,
    pub(crate) boot: BootClasses,
    config: ObjectModelConfig,
    stats: ObjectModelStats,
    invalidator: Arc<dyn MethodCacheInvalidator>,
    pub(crate) attached_slot: InternedString,
}

impl ObjectSpace {
    /// Boot a space with the default configuration and no cache hook.
    pub fn new() -> Self {
        Self::boot_with(ObjectModelConfig::default(), Arc::new(NoopInvalidator))
    }

    /// Boot a space with an explicit configuration and invalidation hook.
    pub fn with_config(
        config: ObjectModelConfig,
        invalidator: Arc<dyn MethodCacheInvalidator>,
    ) -> GarnetResult<Self> {
        config.validate()?;
        Ok(Self::boot_with(config, invalidator))
    }

    fn boot_with(config: ObjectModelConfig, invalidator: Arc<dyn MethodCacheInvalidator>) -> Self {
        let capacity = config.initial_class_capacity;
        let mut space = Self {
            nodes: Arena::with_capacity(capacity),
            method_tables: Arena::with_capacity(capacity),
            var_tables: Arena::new(),
            instances: Arena::new(),
            boot: BootClasses::default(),
            config,
            stats: ObjectModelStats::new(),
            invalidator,
            attached_slot: intern(ATTACHED_SLOT),
        };

        // Class does not exist yet; the four roots get their klass below.
        let basic_object = space.boot_class(None);
        let object = space.boot_class(Some(basic_object));
        let module = space.boot_class(Some(object));
        let class = space.boot_class(Some(module));
        space.boot.basic_object = basic_object;
        space.boot.object = object;
        space.boot.module = module;
        space.boot.class = class;

        for (id, name) in [
            (basic_object, "BasicObject"),
            (object, "Object"),
            (module, "Module"),
            (class, "Class"),
        ] {
            space.nodes[id].set_klass(class);
            space.set_name(id, name);
        }

        let mut meta_super = class;
        for id in [basic_object, object, module, class] {
            meta_super = space.make_metaclass_for(&Value::Class(id), meta_super);
        }

        space.boot.nil_class = space.define_boot_class("NilClass");
        space.boot.true_class = space.define_boot_class("TrueClass");
        space.boot.false_class = space.define_boot_class("FalseClass");
        space.boot.integer = space.define_boot_class("Integer");
        space.boot.symbol = space.define_boot_class("Symbol");
        space
    }

    fn define_boot_class(&mut self, name: &str) -> ClassId {
        let class = self.boot_subclass(self.boot.object);
        self.set_name(class, name);
        class
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn boot(&self) -> &BootClasses {
        &self.boot
    }

    #[inline]
    pub fn config(&self) -> &ObjectModelConfig {
        &self.config
    }

    #[inline]
    pub fn stats(&self) -> &ObjectModelStats {
        &self.stats
    }

    /// The class node behind `id`.
    #[inline]
    pub fn node(&self, id: ClassId) -> &ClassNode {
        &self.nodes[id]
    }

    /// Number of class nodes, proxies included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn instance(&self, id: ObjectId) -> Option<&Instance> {
        self.instances.get(id)
    }

    /// The method table a node owns or aliases.
    #[inline]
    pub fn method_table_of(&self, class: ClassId) -> &MethodTable {
        self.nodes[class].methods().get(&self.method_tables)
    }

    #[inline]
    pub fn var_table_of(&self, class: ClassId) -> Option<&VarTable> {
        self.nodes[class].vars().map(|view| view.get(&self.var_tables))
    }

    /// Superclass links starting at `start` itself.
    pub fn superclass_chain(&self, start: Option<ClassId>) -> SuperChain<'_> {
        SuperChain::new(&self.nodes, start)
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Allocate a node that owns a fresh, empty method table.
    pub(crate) fn alloc_node(
        &mut self,
        kind: ClassKind,
        superclass: Option<ClassId>,
        klass: ClassId,
    ) -> ClassId {
        let table = Owned::new(self.method_tables.alloc(MethodTable::new()));
        self.nodes
            .alloc(ClassNode::owning(kind, superclass, klass, table))
    }

    /// A bare class with an empty method table. `None` only for a root.
    pub fn boot_class(&mut self, superclass: Option<ClassId>) -> ClassId {
        let class = self.alloc_node(ClassKind::Class, superclass, self.boot.class);
        if let Some(stats) = self.tracked() {
            stats.record_class();
        }
        class
    }

    /// A bare module: empty method table, no superclass.
    pub fn new_module(&mut self) -> ClassId {
        let module = self.alloc_node(ClassKind::Module, None, self.boot.module);
        if let Some(stats) = self.tracked() {
            stats.record_module();
        }
        self.trace(|| format!("module {}", self.inspect_class(module)));
        module
    }

    /// A class inheriting from `superclass`, without a metaclass.
    pub fn new_subclass(&mut self, superclass: ClassId) -> GarnetResult<ClassId> {
        self.check_inheritable(superclass)?;
        Ok(self.boot_class(Some(superclass)))
    }

    /// A class inheriting from `superclass` together with its metaclass,
    /// whose superclass is the class of `superclass`.
    pub fn define_class(&mut self, superclass: ClassId) -> GarnetResult<ClassId> {
        self.check_inheritable(superclass)?;
        Ok(self.boot_subclass(superclass))
    }

    pub(crate) fn boot_subclass(&mut self, superclass: ClassId) -> ClassId {
        let class = self.boot_class(Some(superclass));
        let meta_super = self.nodes[superclass].klass();
        self.make_metaclass_for(&Value::Class(class), meta_super);
        self.trace(|| {
            format!(
                "class {} < {}",
                self.inspect_class(class),
                self.inspect_class(superclass)
            )
        });
        class
    }

    fn check_inheritable(&self, superclass: ClassId) -> GarnetResult<()> {
        let node = &self.nodes[superclass];
        if node.is_singleton() {
            return Err(GarnetError::type_error("can't make subclass of singleton class"));
        }
        if !node.is_class() {
            return Err(GarnetError::type_error(format!(
                "superclass must be a Class ({} given)",
                node.kind().label()
            )));
        }
        if superclass == self.boot.class {
            return Err(GarnetError::type_error("can't make subclass of Class"));
        }
        Ok(())
    }

    /// Attach a display name.
    pub fn set_name(&mut self, class: ClassId, name: &str) {
        self.nodes[class].set_name(intern(name));
    }

    // =========================================================================
    // Values
    // =========================================================================

    /// Direct class of a value: its singleton class when one exists.
    pub fn class_of(&self, value: &Value) -> ClassId {
        match value {
            Value::Nil => self.boot.nil_class,
            Value::True => self.boot.true_class,
            Value::False => self.boot.false_class,
            Value::Fixnum(_) => self.boot.integer,
            Value::Symbol(_) => self.boot.symbol,
            Value::Object(id) => self.instances[*id].klass,
            Value::Class(id) => self.nodes[*id].klass(),
        }
    }

    /// Repoint the direct class of a heap value. Immediates are ignored.
    pub(crate) fn set_class_of(&mut self, value: &Value, klass: ClassId) {
        match value {
            Value::Object(id) => self.instances[*id].klass = klass,
            Value::Class(id) => self.nodes[*id].set_klass(klass),
            _ => {}
        }
    }

    /// First ancestor of `class` that is neither a singleton nor a proxy.
    pub fn real_class(&self, class: ClassId) -> ClassId {
        let mut current = class;
        loop {
            let node = &self.nodes[current];
            if !node.is_singleton() && !node.is_include_proxy() {
                return current;
            }
            match node.superclass() {
                Some(next) => current = next,
                None => return current,
            }
        }
    }

    /// The class reflection reports for a value.
    pub fn real_class_of(&self, value: &Value) -> ClassId {
        self.real_class(self.class_of(value))
    }

    /// New instance of `class`.
    pub fn allocate(&mut self, class: ClassId) -> GarnetResult<ObjectId> {
        let node = &self.nodes[class];
        match node.kind() {
            ClassKind::Class => {}
            ClassKind::Singleton => {
                return Err(GarnetError::type_error("can't create instance of singleton class"));
            }
            kind => {
                return Err(GarnetError::type_error(format!(
                    "wrong argument type {} (expected Class)",
                    kind.label()
                )));
            }
        }
        if !node.is_initialized() {
            return Err(GarnetError::type_error("can't instantiate uninitialized class"));
        }
        let b = &self.boot;
        let no_allocator = [
            b.class,
            b.module,
            b.nil_class,
            b.true_class,
            b.false_class,
            b.integer,
            b.symbol,
        ];
        if no_allocator.contains(&class) {
            return Err(GarnetError::type_error(format!(
                "allocator undefined for {}",
                self.inspect_class(class)
            )));
        }
        Ok(self.instances.alloc(Instance::new(class)))
    }

    /// Freeze a heap value. Immediates are always frozen.
    pub fn freeze(&mut self, value: &Value) {
        match value {
            Value::Object(id) => self.instances[*id].flags |= ObjectFlags::FROZEN,
            Value::Class(id) => self.nodes[*id].add_flags(ClassFlags::FROZEN),
            _ => {}
        }
    }

    pub fn is_frozen(&self, value: &Value) -> bool {
        match value {
            Value::Object(id) => self.instances[*id].is_frozen(),
            Value::Class(id) => self.nodes[*id].is_frozen(),
            _ => true,
        }
    }

    pub fn instance_variable_get(&self, value: &Value, name: &str) -> Option<Value> {
        let name = intern(name);
        match value {
            Value::Object(id) => self.instances[*id].ivars.get(&name).cloned(),
            Value::Class(id) => self.var_table_of(*id)?.get(&name).cloned(),
            _ => None,
        }
    }

    pub fn instance_variable_set(
        &mut self,
        value: &Value,
        name: &str,
        ivar: Value,
    ) -> GarnetResult<()> {
        if self.is_frozen(value) {
            return Err(GarnetError::frozen_error(format!(
                "can't modify frozen {}",
                self.inspect_class(self.real_class_of(value))
            )));
        }
        let name = intern(name);
        match value {
            Value::Object(id) => {
                self.instances[*id].ivars.set(name, ivar);
            }
            Value::Class(id) => {
                self.owned_vars_mut(*id)?.set(name, ivar);
            }
            _ => {}
        }
        Ok(())
    }

    // =========================================================================
    // Variable Tables
    // =========================================================================

    /// The node's variable table, allocating an owned one if missing.
    pub(crate) fn ensure_var_table(&mut self, class: ClassId) -> View<VarTable> {
        if let Some(view) = self.nodes[class].vars() {
            return view;
        }
        let owned = Owned::new(self.var_tables.alloc(VarTable::new()));
        let view = owned.view();
        self.nodes[class].set_owned_vars(owned);
        view
    }

    /// Mutable access to a variable table; only through its owner.
    pub(crate) fn owned_vars_mut(&mut self, class: ClassId) -> GarnetResult<&mut VarTable> {
        self.ensure_var_table(class);
        match self.nodes[class].vars_owner() {
            Some(owner) => Ok(owner.get_mut(&mut self.var_tables)),
            None => Err(GarnetError::type_error(format!(
                "can't modify variables of {} through an include proxy",
                self.inspect_class(class)
            ))),
        }
    }

    // =========================================================================
    // Checks
    // =========================================================================

    /// `FrozenError` if `class` is frozen.
    pub(crate) fn check_frozen_class(&self, class: ClassId) -> GarnetResult<()> {
        let node = &self.nodes[class];
        if !node.is_frozen() {
            return Ok(());
        }
        let desc = match node.kind() {
            ClassKind::Singleton => "object",
            ClassKind::Module | ClassKind::IncludeProxy => "module",
            ClassKind::Class => "class",
        };
        Err(GarnetError::frozen_error(format!("can't modify frozen {}", desc)))
    }

    // =========================================================================
    // Display
    // =========================================================================

    /// Display string of a class node.
    pub fn inspect_class(&self, class: ClassId) -> String {
        let node = &self.nodes[class];
        if let Some(name) = node.name() {
            return name.as_str().to_string();
        }
        match node.kind() {
            ClassKind::Singleton => match self.attached_object(class) {
                Some(attached) => format!("#<Class:{}>", self.inspect_value(&attached)),
                None => format!("#<Class:{:?}>", class),
            },
            ClassKind::IncludeProxy => self.inspect_class(node.klass()),
            ClassKind::Module => format!("#<Module:{:?}>", class),
            ClassKind::Class => format!("#<Class:{:?}>", class),
        }
    }

    pub fn inspect_value(&self, value: &Value) -> String {
        match value {
            Value::Nil => "nil".to_string(),
            Value::True => "true".to_string(),
            Value::False => "false".to_string(),
            Value::Fixnum(n) => n.to_string(),
            Value::Symbol(sym) => format!(":{}", sym),
            Value::Class(id) => self.inspect_class(*id),
            Value::Object(id) => format!(
                "#<{}:{:?}>",
                self.inspect_class(self.real_class_of(value)),
                id
            ),
        }
    }

    // =========================================================================
    // Observability
    // =========================================================================

    /// Stats sink, if stats tracking is enabled.
    #[inline]
    pub(crate) fn tracked(&self) -> Option<&ObjectModelStats> {
        self.config.track_stats.then_some(&self.stats)
    }

    /// Emit one trace line when mutation tracing is enabled.
    #[inline]
    pub(crate) fn trace<F: FnOnce() -> String>(&self, message: F) {
        if self.config.trace_mutations {
            eprintln!("[garnet] {}", message());
        }
    }

    pub(crate) fn invalidate_all(&self) {
        if let Some(stats) = self.tracked() {
            stats.record_invalidation();
        }
        self.invalidator.invalidate_all();
    }

    pub(crate) fn invalidate_method(&self, name: &InternedString) {
        self.invalidator.invalidate_method(name);
    }
}

impl Default for ObjectSpace {
    fn default() -> Self {
        Self::new()
    }
}
