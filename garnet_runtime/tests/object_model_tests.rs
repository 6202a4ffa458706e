//! Object model integration tests.
//!
//! Module inclusion, singleton classes and method enumeration exercised
//! together through the public `ObjectSpace` API.

use garnet_core::{InternedString, intern};
use garnet_runtime::{
    ClassId, CountingInvalidator, MethodBody, MethodFilter, ObjectModelConfig, ObjectSpace, Value,
    Visibility,
};
use std::sync::Arc;

// =============================================================================
// Helpers
// =============================================================================

fn counted_space() -> (ObjectSpace, Arc<CountingInvalidator>) {
    let counter = Arc::new(CountingInvalidator::new());
    let space = ObjectSpace::with_config(ObjectModelConfig::default(), counter.clone())
        .expect("default config is valid");
    (space, counter)
}

fn has(names: &[InternedString], name: &str) -> bool {
    names.iter().any(|n| n.as_str() == name)
}

fn chain_len(space: &ObjectSpace, class: ClassId) -> usize {
    space.superclass_chain(Some(class)).count()
}

// =============================================================================
// Inclusion
// =============================================================================

#[test]
fn test_scenario_include_public_method() {
    let mut space = ObjectSpace::new();
    let root = space.boot_class(None);
    let c = space.new_subclass(root).unwrap();
    let m = space.new_module();
    space
        .define_method(m, "foo", MethodBody::native(0), Visibility::Public)
        .unwrap();

    space.include_module(c, m).unwrap();

    assert_eq!(space.ancestors(c).as_slice(), &[c, m, root]);
    let names = space.method_names(c, true, MethodFilter::AllButPrivate);
    assert!(has(&names, "foo"));
}

#[test]
fn test_scenario_private_override_shadows_module() {
    let mut space = ObjectSpace::new();
    let root = space.boot_class(None);
    let c = space.new_subclass(root).unwrap();
    let m = space.new_module();
    space
        .define_method(m, "foo", MethodBody::native(0), Visibility::Public)
        .unwrap();
    space.include_module(c, m).unwrap();

    space
        .define_private_method(c, "foo", MethodBody::native(0))
        .unwrap();

    assert!(!has(&space.method_names(c, true, MethodFilter::PublicOnly), "foo"));
    assert!(!has(&space.method_names(c, true, MethodFilter::AllButPrivate), "foo"));
    assert!(has(&space.method_names(c, true, MethodFilter::PrivateOnly), "foo"));
}

#[test]
fn test_include_is_idempotent_and_invalidates_once() {
    let (mut space, counter) = counted_space();
    let object = space.boot().object;
    let c = space.define_class(object).unwrap();
    let m = space.new_module();

    assert!(space.include_module(c, m).unwrap());
    let after_first = space.ancestors(c);
    assert_eq!(counter.full_invalidations(), 1);

    assert!(!space.include_module(c, m).unwrap());
    assert_eq!(space.ancestors(c), after_first);
    assert_eq!(counter.full_invalidations(), 1);
}

#[test]
fn test_nested_module_order() {
    let mut space = ObjectSpace::new();
    let object = space.boot().object;
    let basic = space.boot().basic_object;
    let c = space.define_class(object).unwrap();
    let m = space.new_module();
    let n = space.new_module();

    space.include_module(m, n).unwrap();
    space.include_module(c, m).unwrap();

    assert_eq!(space.ancestors(c).as_slice(), &[c, m, n, object, basic]);
    assert_eq!(space.included_modules(c).as_slice(), &[m, n]);
}

#[test]
fn test_includes_module_inherited_by_later_subclass() {
    let mut space = ObjectSpace::new();
    let object = space.boot().object;
    let c = space.define_class(object).unwrap();
    let m = space.new_module();

    assert!(!space.includes_module(c, m).unwrap());
    space.include_module(c, m).unwrap();
    assert!(space.includes_module(c, m).unwrap());

    let sub = space.define_class(c).unwrap();
    assert!(space.includes_module(sub, m).unwrap());
    assert!(space.included_modules(sub).contains(&m));
}

#[test]
fn test_subclass_reinclude_does_not_duplicate() {
    let mut space = ObjectSpace::new();
    let object = space.boot().object;
    let c = space.define_class(object).unwrap();
    let m = space.new_module();
    space.include_module(c, m).unwrap();

    let sub = space.define_class(c).unwrap();
    assert!(!space.include_module(sub, m).unwrap());

    let ancestors = space.ancestors(sub);
    assert_eq!(ancestors.iter().filter(|&&id| id == m).count(), 1);
}

#[test]
fn test_cyclic_include_leaves_chain_unchanged() {
    let mut space = ObjectSpace::new();
    let m = space.new_module();
    let n = space.new_module();
    let o = space.new_module();
    space.include_module(n, m).unwrap();
    space.include_module(o, n).unwrap();

    let before = space.ancestors(m);
    let nodes = space.node_count();
    let err = space.include_module(m, o).unwrap_err();

    assert_eq!(err.kind_name(), "ArgumentError");
    assert_eq!(err.to_string(), "ArgumentError: cyclic include detected");
    assert_eq!(space.ancestors(m), before);
    assert_eq!(space.node_count(), nodes);
}

#[test]
fn test_chains_stay_bounded() {
    let mut space = ObjectSpace::new();
    let object = space.boot().object;
    let mut classes = vec![object];
    let mut modules = Vec::new();

    for i in 0..12 {
        let parent = classes[i / 2];
        let class = space.define_class(parent).unwrap();
        let module = space.new_module();
        if let Some(&prev) = modules.last() {
            space.include_module(module, prev).unwrap();
        }
        space.include_module(class, module).unwrap();
        for &earlier in modules.iter().step_by(3) {
            space.include_module(class, earlier).unwrap();
        }
        classes.push(class);
        modules.push(module);
    }

    let limit = space.node_count();
    for &class in &classes {
        assert!(chain_len(&space, class) <= limit);
        let ancestors = space.ancestors(class);
        let mut sorted = ancestors.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), ancestors.len(), "duplicate ancestor");
    }
}

// =============================================================================
// Singleton Classes
// =============================================================================

#[test]
fn test_singleton_class_identity() {
    let mut space = ObjectSpace::new();
    let object = space.boot().object;
    let obj = Value::Object(space.allocate(object).unwrap());

    let first = space.singleton_class_of(&obj).unwrap();
    let second = space.singleton_class_of(&obj).unwrap();
    assert_eq!(first, second);
    assert_eq!(space.real_class_of(&obj), object);
    assert!(!space.ancestors(first).contains(&first));
}

#[test]
fn test_clone_singleton_without_singleton_returns_class() {
    let mut space = ObjectSpace::new();
    let object = space.boot().object;
    let foo = space.define_class(object).unwrap();
    let obj = Value::Object(space.allocate(foo).unwrap());

    assert_eq!(space.clone_singleton(&obj), foo);
}

#[test]
fn test_singleton_methods_on_clone_are_independent() {
    let mut space = ObjectSpace::new();
    let object = space.boot().object;
    let obj = Value::Object(space.allocate(object).unwrap());
    space
        .define_singleton_method(&obj, "greet", MethodBody::compiled(1))
        .unwrap();

    let copy = space.clone_object(&obj).unwrap();
    space.undef_method(space.class_of(&copy), "greet").unwrap();

    assert_eq!(space.singleton_methods(&obj, true), vec![intern("greet")]);
    assert!(space.singleton_methods(&copy, true).is_empty());
}

#[test]
fn test_class_methods_through_metaclass() {
    let mut space = ObjectSpace::new();
    let object = space.boot().object;
    let parent = space.define_class(object).unwrap();
    let child = space.define_class(parent).unwrap();

    space
        .define_singleton_method(&Value::Class(parent), "create", MethodBody::native(-1))
        .unwrap();

    let child_meta = space.singleton_class_of(&Value::Class(child)).unwrap();
    let (found_in, _) = space.find_method_slot(child_meta, "create").unwrap();
    assert_eq!(found_in, space.class_of(&Value::Class(parent)));
    assert!(space.singleton_methods(&Value::Class(child), false).is_empty());
    assert_eq!(
        space.singleton_methods(&Value::Class(child), true),
        vec![intern("create")]
    );
}

#[test]
fn test_frozen_object_gets_frozen_singleton() {
    let mut space = ObjectSpace::new();
    let object = space.boot().object;
    let obj = Value::Object(space.allocate(object).unwrap());
    space.freeze(&obj);

    let singleton = space.singleton_class_of(&obj).unwrap();
    let err = space
        .define_method(singleton, "late", MethodBody::native(0), Visibility::Public)
        .unwrap_err();
    assert_eq!(err.to_string(), "FrozenError: can't modify frozen object");
}

#[test]
fn test_inspect_singleton() {
    let mut space = ObjectSpace::new();
    let object = space.boot().object;
    let foo = space.define_class(object).unwrap();
    space.set_name(foo, "Foo");

    let meta = space.class_of(&Value::Class(foo));
    assert_eq!(space.inspect_class(meta), "#<Class:Foo>");
}

// =============================================================================
// Statistics
// =============================================================================

#[test]
fn test_stats_follow_mutations() {
    let mut space = ObjectSpace::new();
    let object = space.boot().object;
    let base = space.stats().snapshot();

    let c = space.define_class(object).unwrap();
    let m = space.new_module();
    space.include_module(c, m).unwrap();
    space.include_module(c, m).unwrap();
    space
        .define_method(m, "x", MethodBody::native(0), Visibility::Public)
        .unwrap();

    let now = space.stats().snapshot();
    assert_eq!(now.classes_created - base.classes_created, 1);
    assert_eq!(now.singletons_created - base.singletons_created, 1);
    assert_eq!(now.modules_created - base.modules_created, 1);
    assert_eq!(now.proxies_spliced - base.proxies_spliced, 1);
    assert_eq!(now.includes_skipped - base.includes_skipped, 1);
    assert_eq!(now.cache_invalidations - base.cache_invalidations, 1);
    assert_eq!(now.methods_defined - base.methods_defined, 1);
}
