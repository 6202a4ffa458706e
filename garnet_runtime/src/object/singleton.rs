//! Singleton classes and object duplication.
//!
//! A singleton class is materialized on first need and becomes the direct
//! class of its object, with the object's previous class as superclass. The
//! back-reference to the object lives in the singleton's variable table
//! under `ATTACHED_SLOT`; it is a lookup key only.
//!
//! ```text
//! obj ──klass──> #<Class:obj> ──super──> Foo ──super──> Object
//! ```
//!
//! Classes get their singleton (metaclass) at definition time. The
//! singleton of a metaclass is `Class` itself.

use super::class::{ClassFlags, ClassKind};
use super::handle::Owned;
use super::space::ObjectSpace;
use super::value::{Instance, ObjectFlags, Value};
use super::ClassId;
use garnet_core::{GarnetError, GarnetResult};

impl ObjectSpace {
    // =========================================================================
    // Materialization
    // =========================================================================

    /// The singleton class of `value`, creating it if needed.
    ///
    /// `nil`, `true` and `false` answer their fixed classes. Fixnums and
    /// symbols have no singleton class.
    pub fn singleton_class_of(&mut self, value: &Value) -> GarnetResult<ClassId> {
        match value {
            Value::Nil => return Ok(self.boot.nil_class),
            Value::True => return Ok(self.boot.true_class),
            Value::False => return Ok(self.boot.false_class),
            Value::Fixnum(_) | Value::Symbol(_) => {
                return Err(GarnetError::type_error("can't define singleton"));
            }
            Value::Class(id) if self.node(*id).is_include_proxy() => {
                return Err(GarnetError::type_error("can't define singleton"));
            }
            Value::Object(_) | Value::Class(_) => {}
        }

        let current = self.class_of(value);
        let klass = if self.is_attached_to(current, value) {
            current
        } else {
            self.make_metaclass_for(value, current)
        };

        if self.config().propagate_frozen
            && self.is_frozen(value)
            && self.node(klass).is_singleton()
        {
            self.nodes[klass].add_flags(ClassFlags::FROZEN);
        }
        Ok(klass)
    }

    /// Give `value` a new singleton class with superclass `superclass`.
    ///
    /// For a value that is itself a singleton class, resets its class to
    /// `Class` and answers `Class`. `superclass` must be a class or a
    /// singleton class; modules only enter a chain through `include_module`.
    pub fn make_metaclass(&mut self, value: &Value, superclass: ClassId) -> GarnetResult<ClassId> {
        match value {
            Value::Object(_) => {}
            Value::Class(id) if !self.node(*id).is_include_proxy() => {}
            _ => return Err(GarnetError::type_error("can't define singleton")),
        }
        match self.node(superclass).kind() {
            ClassKind::Class | ClassKind::Singleton => {}
            ClassKind::Module | ClassKind::IncludeProxy => {
                return Err(GarnetError::type_error(format!(
                    "superclass must be a Class ({} given)",
                    self.node(superclass).kind().label()
                )));
            }
        }
        Ok(self.make_metaclass_for(value, superclass))
    }

    /// `make_metaclass` for a value already known to be a heap object or a
    /// non-proxy class node.
    pub(crate) fn make_metaclass_for(&mut self, value: &Value, superclass: ClassId) -> ClassId {
        if let Value::Class(id) = value {
            if self.node(*id).is_singleton() {
                let class = self.boot.class;
                self.nodes[*id].set_klass(class);
                return class;
            }
        }

        let klass = self.alloc_node(ClassKind::Singleton, Some(superclass), self.boot.class);
        self.set_class_of(value, klass);
        self.set_attached(klass, value.clone());

        if let Some(stats) = self.tracked() {
            stats.record_singleton();
        }
        self.trace(|| format!("singleton {}", self.inspect_class(klass)));
        klass
    }

    // =========================================================================
    // Attachment
    // =========================================================================

    /// Record `value` as the object `singleton` belongs to.
    ///
    /// Rejects a value whose own attachment chain leads back to `singleton`.
    pub fn attach_singleton(&mut self, singleton: ClassId, value: &Value) -> GarnetResult<()> {
        if !self.node(singleton).is_singleton() {
            return Err(GarnetError::type_error(format!(
                "{} is not a singleton class",
                self.inspect_class(singleton)
            )));
        }
        if self.attachment_reaches(value, singleton) {
            return Err(GarnetError::argument_error("cyclic singleton attachment"));
        }
        self.set_attached(singleton, value.clone());
        Ok(())
    }

    /// Whether following attachments from `value` arrives at `target`.
    fn attachment_reaches(&self, value: &Value, target: ClassId) -> bool {
        let mut cursor = value.clone();
        // Every link is a distinct singleton node.
        for _ in 0..=self.node_count() {
            match cursor {
                Value::Class(id) if id == target => return true,
                Value::Class(id) => match self.attached_object(id) {
                    Some(next) => cursor = next,
                    None => return false,
                },
                _ => return false,
            }
        }
        true
    }

    /// The object a singleton class is attached to.
    pub fn attached_object(&self, singleton: ClassId) -> Option<Value> {
        if !self.node(singleton).is_singleton() {
            return None;
        }
        self.var_table_of(singleton)?
            .get(&self.attached_slot)
            .cloned()
    }

    fn is_attached_to(&self, class: ClassId, value: &Value) -> bool {
        self.attached_object(class).as_ref() == Some(value)
    }

    fn set_attached(&mut self, singleton: ClassId, value: Value) {
        self.ensure_var_table(singleton);
        if let Some(owner) = self.nodes[singleton].vars_owner() {
            owner
                .get_mut(&mut self.var_tables)
                .set(self.attached_slot.clone(), value);
        }
    }

    // =========================================================================
    // Cloning
    // =========================================================================

    /// Class for a copy of `value`: an unattached clone of its singleton
    /// class if it has one, otherwise its class unchanged.
    pub fn clone_singleton(&mut self, value: &Value) -> ClassId {
        let original = self.class_of(value);
        let node = self.node(original);
        if !node.is_singleton() {
            return original;
        }
        let (superclass, klass, flags) = (node.superclass(), node.klass(), node.flags());
        // A singleton whose own class is a singleton gets that cloned too.
        let klass = if self.node(klass).is_singleton() {
            self.clone_singleton(&Value::Class(original))
        } else {
            klass
        };

        let clone = self.alloc_node(ClassKind::Singleton, superclass, klass);
        self.nodes[clone].add_flags(flags);

        if let Some(vars) = self.var_table_of(original) {
            let mut copy = vars.clone();
            copy.remove(&self.attached_slot);
            let owned = Owned::new(self.var_tables.alloc(copy));
            self.nodes[clone].set_owned_vars(owned);
        }

        let methods = self.method_table_of(original).rebased(clone);
        if let Some(owner) = self.nodes[clone].methods_owner() {
            *owner.get_mut(&mut self.method_tables) = methods;
        }

        if let Some(stats) = self.tracked() {
            stats.record_singleton_clone();
        }
        self.trace(|| format!("clone singleton {}", self.inspect_class(original)));
        clone
    }

    /// Shallow copy of a heap value, keeping its singleton methods and
    /// frozen state.
    pub fn clone_object(&mut self, value: &Value) -> GarnetResult<Value> {
        match value {
            Value::Object(id) => {
                let (ivars, flags) = {
                    let instance = &self.instances[*id];
                    (instance.ivars.clone(), instance.flags)
                };
                let klass = self.clone_singleton(value);

                let mut copy = Instance::new(klass);
                copy.ivars = ivars;
                copy.flags = flags & ObjectFlags::FROZEN;
                let copy = Value::Object(self.instances.alloc(copy));

                if self.node(klass).is_singleton() {
                    self.set_attached(klass, copy.clone());
                }
                Ok(copy)
            }
            Value::Class(id) => {
                let copy = self.duplicate_class(*id)?;
                if self.node(*id).is_frozen() {
                    self.nodes[copy].add_flags(ClassFlags::FROZEN);
                }
                Ok(Value::Class(copy))
            }
            _ => Err(GarnetError::type_error(format!(
                "can't clone {}",
                self.inspect_class(self.class_of(value))
            ))),
        }
    }

    // =========================================================================
    // Class Duplication
    // =========================================================================

    /// An uninitialized class or module, to be filled by `initialize_copy`.
    pub fn allocate_shell(&mut self, kind: ClassKind) -> GarnetResult<ClassId> {
        let shell = match kind {
            ClassKind::Class => self.boot_class(None),
            ClassKind::Module => self.new_module(),
            other => {
                return Err(GarnetError::type_error(format!(
                    "allocator undefined for {}",
                    other.label()
                )));
            }
        };
        self.nodes[shell].remove_flags(ClassFlags::INITIALIZED);
        Ok(shell)
    }

    /// Fill `clone` with copies of `orig`'s tables, sharing its superclass
    /// chain. `clone` must be a fresh shell of the same kind.
    pub fn initialize_copy(&mut self, clone: ClassId, orig: ClassId) -> GarnetResult<()> {
        if clone == orig {
            return Ok(());
        }
        let orig_kind = self.node(orig).kind();
        if orig_kind == ClassKind::Singleton {
            return Err(GarnetError::type_error("can't copy singleton class"));
        }
        let target = self.node(clone);
        if target.is_initialized() {
            return Err(GarnetError::type_error(format!(
                "already initialized {}",
                if target.is_module() { "module" } else { "class" }
            )));
        }
        self.check_frozen_class(clone)?;
        if target.kind() != orig_kind {
            return Err(GarnetError::type_error(
                "initialize_copy should take same class object",
            ));
        }

        let orig_klass = self.node(orig).klass();
        self.nodes[clone].set_klass(orig_klass);
        let meta = self.clone_singleton(&Value::Class(clone));
        self.nodes[clone].set_klass(meta);
        if self.node(meta).is_singleton() {
            self.set_attached(meta, Value::Class(clone));
        }

        let superclass = self.node(orig).superclass();
        self.nodes[clone].set_superclass(superclass);

        if let Some(vars) = self.var_table_of(orig) {
            let owned = Owned::new(self.var_tables.alloc(vars.clone()));
            self.nodes[clone].set_owned_vars(owned);
        }

        let methods = self.method_table_of(orig).rebased(clone);
        if let Some(owner) = self.nodes[clone].methods_owner() {
            *owner.get_mut(&mut self.method_tables) = methods;
        }

        self.nodes[clone].add_flags(ClassFlags::INITIALIZED);
        self.trace(|| {
            format!(
                "copy {} -> {}",
                self.inspect_class(orig),
                self.inspect_class(clone)
            )
        });
        Ok(())
    }

    /// A copy of a class or module with its own method and variable
    /// tables and a clone of its metaclass.
    pub fn duplicate_class(&mut self, orig: ClassId) -> GarnetResult<ClassId> {
        let kind = self.node(orig).kind();
        if kind == ClassKind::Singleton {
            return Err(GarnetError::type_error("can't copy singleton class"));
        }
        let shell = self.allocate_shell(kind)?;
        self.initialize_copy(shell, orig)?;
        Ok(shell)
    }
}
