//! Method definition on class nodes.
//!
//! Every write goes through the node that owns the method table. Writes
//! aimed at an include proxy fail, and frozen classes reject all of them.
//! Each successful write notifies the cache hook for the selector.

use super::method_table::{MethodBody, MethodEntry, MethodSlot, MethodTable, Visibility};
use super::space::ObjectSpace;
use super::value::Value;
use super::ClassId;
use garnet_core::{GarnetError, GarnetResult, InternedString, intern};

impl ObjectSpace {
    /// Mutable access to a class's own method table.
    fn owned_methods_mut(&mut self, class: ClassId) -> GarnetResult<&mut MethodTable> {
        self.check_frozen_class(class)?;
        match self.nodes[class].methods_owner() {
            Some(owner) => Ok(owner.get_mut(&mut self.method_tables)),
            None => Err(GarnetError::type_error(format!(
                "can't define methods of {} through an include proxy",
                self.inspect_class(class)
            ))),
        }
    }

    /// Store `slot` under `name` in `class`'s own table.
    fn write_slot(&mut self, class: ClassId, name: InternedString, slot: MethodSlot) -> GarnetResult<()> {
        self.owned_methods_mut(class)?.insert(name.clone(), slot);

        if let Some(stats) = self.tracked() {
            stats.record_method();
        }
        self.invalidate_method(&name);
        self.trace(|| format!("def {}#{}", self.inspect_class(class), name));
        Ok(())
    }

    // =========================================================================
    // Definition
    // =========================================================================

    pub fn define_method(
        &mut self,
        class: ClassId,
        name: &str,
        body: MethodBody,
        visibility: Visibility,
    ) -> GarnetResult<()> {
        let entry = MethodEntry {
            body,
            visibility,
            origin: class,
        };
        self.write_slot(class, intern(name), MethodSlot::Method(entry))
    }

    pub fn define_private_method(&mut self, class: ClassId, name: &str, body: MethodBody) -> GarnetResult<()> {
        self.define_method(class, name, body, Visibility::Private)
    }

    pub fn define_protected_method(&mut self, class: ClassId, name: &str, body: MethodBody) -> GarnetResult<()> {
        self.define_method(class, name, body, Visibility::Protected)
    }

    /// Tombstone `name` in `class`, hiding any inherited definition.
    pub fn undef_method(&mut self, class: ClassId, name: &str) -> GarnetResult<()> {
        self.write_slot(class, intern(name), MethodSlot::Undefined)
    }

    /// Public method on the singleton class of `value`.
    pub fn define_singleton_method(&mut self, value: &Value, name: &str, body: MethodBody) -> GarnetResult<()> {
        let singleton = self.singleton_class_of(value)?;
        self.define_method(singleton, name, body, Visibility::Public)
    }

    /// Private instance method plus public singleton method of `module`.
    pub fn define_module_function(&mut self, module: ClassId, name: &str, body: MethodBody) -> GarnetResult<()> {
        self.expect_module(module)?;
        self.define_private_method(module, name, body.clone())?;
        self.define_singleton_method(&Value::Class(module), name, body)
    }

    /// Make `new_name` another name for the method `old_name` resolves to
    /// from `class`. Modules also see the methods of `Object`.
    pub fn define_alias(&mut self, class: ClassId, new_name: &str, old_name: &str) -> GarnetResult<()> {
        self.check_frozen_class(class)?;
        let old = intern(old_name);

        let mut found = self.find_method_slot(class, old_name);
        if found.is_none() && self.node(class).is_module() {
            found = self.find_method_slot(self.boot.object, old_name);
        }
        let entry = match found.and_then(|(_, slot)| slot.entry()) {
            Some(entry) => entry.clone(),
            None => {
                return Err(GarnetError::name_error(
                    old.clone(),
                    format!(
                        "undefined method `{}' for class `{}'",
                        old,
                        self.inspect_class(class)
                    ),
                ));
            }
        };
        self.write_slot(class, intern(new_name), MethodSlot::Method(entry))
    }

    /// Public accessor methods for the instance variable `@name`.
    pub fn define_attr(&mut self, class: ClassId, name: &str, read: bool, write: bool) -> GarnetResult<()> {
        if !is_attribute_name(name) {
            return Err(GarnetError::name_error(
                intern(name),
                format!("invalid attribute name `{}'", name),
            ));
        }
        let ivar = intern(&format!("@{}", name));
        if read {
            self.define_method(class, name, MethodBody::attr_reader(ivar.clone()), Visibility::Public)?;
        }
        if write {
            self.define_method(
                class,
                &format!("{}=", name),
                MethodBody::attr_writer(ivar),
                Visibility::Public,
            )?;
        }
        Ok(())
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Nearest slot for `name` on the chain starting at `class`, with the
    /// node it was found in. A tombstone is returned as found.
    pub fn find_method_slot(&self, class: ClassId, name: &str) -> Option<(ClassId, &MethodSlot)> {
        let name = intern(name);
        self.superclass_chain(Some(class))
            .find_map(|(id, _)| self.method_table_of(id).get(&name).map(|slot| (id, slot)))
    }
}

fn is_attribute_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CountingInvalidator;
    use crate::config::ObjectModelConfig;
    use crate::object::method_table::MethodKind;
    use std::sync::Arc;

    fn class_with_parent(space: &mut ObjectSpace) -> (ClassId, ClassId) {
        let object = space.boot().object;
        let parent = space.define_class(object).unwrap();
        let child = space.define_class(parent).unwrap();
        (parent, child)
    }

    #[test]
    fn test_define_sets_origin_and_invalidates() {
        let counter = Arc::new(CountingInvalidator::new());
        let mut space = ObjectSpace::with_config(ObjectModelConfig::default(), counter.clone()).unwrap();
        let object = space.boot().object;
        let foo = space.define_class(object).unwrap();

        space.define_method(foo, "run", MethodBody::native(1), Visibility::Public).unwrap();

        let (found_in, slot) = space.find_method_slot(foo, "run").unwrap();
        assert_eq!(found_in, foo);
        assert_eq!(slot.entry().unwrap().origin, foo);
        assert_eq!(counter.invalidated_names(), vec![intern("run")]);
        assert_eq!(counter.full_invalidations(), 0);
    }

    #[test]
    fn test_define_on_proxy_rejected() {
        let mut space = ObjectSpace::new();
        let object = space.boot().object;
        let foo = space.define_class(object).unwrap();
        let m = space.new_module();
        space.include_module(foo, m).unwrap();
        let proxy = space.node(foo).superclass().unwrap();

        let err = space
            .define_method(proxy, "x", MethodBody::native(0), Visibility::Public)
            .unwrap_err();
        assert_eq!(err.kind_name(), "TypeError");
        assert!(space.method_table_of(m).is_empty());
    }

    #[test]
    fn test_define_on_frozen_rejected() {
        let mut space = ObjectSpace::new();
        let object = space.boot().object;
        let foo = space.define_class(object).unwrap();
        space.freeze(&Value::Class(foo));

        let err = space.undef_method(foo, "x").unwrap_err();
        assert_eq!(err.kind_name(), "FrozenError");
    }

    #[test]
    fn test_find_method_slot_stops_at_tombstone() {
        let mut space = ObjectSpace::new();
        let (parent, child) = class_with_parent(&mut space);
        space.define_method(parent, "gone", MethodBody::native(0), Visibility::Public).unwrap();
        space.undef_method(child, "gone").unwrap();

        let (found_in, slot) = space.find_method_slot(child, "gone").unwrap();
        assert_eq!(found_in, child);
        assert!(slot.is_undefined());
        assert!(space.find_method_slot(child, "never").is_none());
    }

    #[test]
    fn test_alias_shares_body() {
        let mut space = ObjectSpace::new();
        let (parent, child) = class_with_parent(&mut space);
        let body = MethodBody::compiled(11);
        space.define_protected_method(parent, "size", body.clone()).unwrap();

        space.define_alias(child, "length", "size").unwrap();
        let (found_in, slot) = space.find_method_slot(child, "length").unwrap();
        let entry = slot.entry().unwrap();
        assert_eq!(found_in, child);
        assert!(entry.body.same_body(&body));
        assert_eq!(entry.visibility, Visibility::Protected);
        assert_eq!(entry.origin, parent);
    }

    #[test]
    fn test_alias_missing_method() {
        let mut space = ObjectSpace::new();
        let (parent, child) = class_with_parent(&mut space);
        space.set_name(child, "Child");
        space.define_method(parent, "hidden", MethodBody::native(0), Visibility::Public).unwrap();
        space.undef_method(child, "hidden").unwrap();

        let err = space.define_alias(child, "x", "hidden").unwrap_err();
        assert_eq!(err.kind_name(), "NameError");
        assert_eq!(err.message(), "undefined method `hidden' for class `Child'");
        assert!(space.define_alias(child, "y", "nothing").is_err());
    }

    #[test]
    fn test_module_alias_falls_back_to_object() {
        let mut space = ObjectSpace::new();
        let object = space.boot().object;
        space.define_method(object, "inspect", MethodBody::native(0), Visibility::Public).unwrap();
        let m = space.new_module();

        space.define_alias(m, "describe", "inspect").unwrap();
        assert!(space.method_table_of(m).contains(&intern("describe")));
    }

    #[test]
    fn test_module_function() {
        let mut space = ObjectSpace::new();
        let m = space.new_module();
        space.define_module_function(m, "helper", MethodBody::native(0)).unwrap();

        assert_eq!(space.private_instance_methods(m, false), vec![intern("helper")]);
        assert_eq!(
            space.singleton_methods(&Value::Class(m), false),
            vec![intern("helper")]
        );

        let object = space.boot().object;
        assert!(space.define_module_function(object, "x", MethodBody::native(0)).is_err());
    }

    #[test]
    fn test_define_attr() {
        let mut space = ObjectSpace::new();
        let object = space.boot().object;
        let point = space.define_class(object).unwrap();
        space.define_attr(point, "x", true, true).unwrap();
        space.define_attr(point, "y", true, false).unwrap();

        assert_eq!(
            space.public_instance_methods(point, false),
            vec![intern("x"), intern("x="), intern("y")]
        );
        let (_, slot) = space.find_method_slot(point, "x=").unwrap();
        assert_eq!(
            slot.entry().unwrap().body.kind(),
            &MethodKind::AttrWriter { ivar: intern("@x") }
        );

        let err = space.define_attr(point, "no-dash", true, false).unwrap_err();
        assert_eq!(err.kind_name(), "NameError");
    }

    #[test]
    fn test_attribute_names() {
        assert!(is_attribute_name("name"));
        assert!(is_attribute_name("_x1"));
        assert!(is_attribute_name("Value"));
        assert!(!is_attribute_name(""));
        assert!(!is_attribute_name("1st"));
        assert!(!is_attribute_name("a?"));
    }
}
