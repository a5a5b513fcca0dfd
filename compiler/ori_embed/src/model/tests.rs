use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_fresh_topology() {
    let rt = ModelRuntime::new();
    let top = rt.top_level_scope();

    assert_eq!(rt.module_name(top), Some("main"));
    assert_eq!(rt.superclass_of(top), Some(rt.object_scope()));
    assert_eq!(rt.superclass_of(rt.object_scope()), None);
    assert!(rt.is_scope_defined(top));
    assert_eq!(rt.current_execution_scope(), None);
}

#[test]
fn test_reserved_module_is_undefined_until_defined() {
    let mut rt = ModelRuntime::new();
    let foo = rt.reserve_module("Foo");
    assert!(!rt.is_scope_defined(foo));

    assert!(rt.define(foo));
    assert!(rt.is_scope_defined(foo));
    assert!(!rt.define(ScopeId::new(99)));
}

#[test]
fn test_constants_are_per_module() {
    let mut rt = ModelRuntime::new();
    let foo = rt.define_module("Foo");
    rt.store_constant(foo, "BAR", ModelValue::int(5));
    rt.store_constant(rt.object_scope(), "BAR", ModelValue::int(1));

    assert_eq!(rt.get_constant(foo, "BAR"), Some(ModelValue::int(5)));
    assert_eq!(rt.get_constant(rt.object_scope(), "BAR"), Some(ModelValue::int(1)));
    assert_eq!(rt.get_constant(rt.top_level_scope(), "BAR"), None);
    assert_eq!(rt.constant_names(foo), vec!["BAR".to_owned()]);

    assert_eq!(rt.remove_constant(foo, "BAR"), Some(ModelValue::int(5)));
    assert!(rt.constant_names(foo).is_empty());
}

#[test]
fn test_predefined_globals() {
    let mut rt = ModelRuntime::new();
    rt.set_global("$count", ModelValue::int(1));

    assert!(rt.is_predefined_global("$stdout"));
    assert!(!rt.is_predefined_global("$count"));
    assert_eq!(
        rt.global_names(),
        vec!["$0".to_owned(), "$stdout".to_owned(), "$count".to_owned()]
    );
}

#[test]
fn test_argv_lives_on_object() {
    let mut rt = ModelRuntime::new();
    rt.set_argv(["-v", "input.txt"]);

    assert_eq!(
        rt.get_constant(rt.object_scope(), "ARGV"),
        Some(ModelValue::list([
            ModelValue::string("-v"),
            ModelValue::string("input.txt"),
        ]))
    );
}

#[test]
fn test_locals_clear() {
    let mut rt = ModelRuntime::new();
    rt.set_local("x", ModelValue::int(1));
    assert_eq!(rt.local_names(), vec!["x".to_owned()]);

    rt.clear_locals();
    assert_eq!(rt.get_local("x"), None);
}
