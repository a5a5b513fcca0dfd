use super::*;

#[test]
fn test_constant_names() {
    let kind = BindingKind::Constant;
    assert!(kind.is_valid_name("MAX"));
    assert!(kind.is_valid_name("ARGV"));
    assert!(kind.is_valid_name("Foo_2"));
    assert!(kind.is_valid_name("A_"));

    // Second character must be a letter or underscore
    assert!(!kind.is_valid_name("A1"));
    // Single character does not match the grammar
    assert!(!kind.is_valid_name("X"));
    assert!(!kind.is_valid_name("max"));
    assert!(!kind.is_valid_name("_MAX"));
    assert!(!kind.is_valid_name("MA-X"));
    assert!(!kind.is_valid_name(""));
    assert!(!kind.is_valid_name("ÄB"));
}

#[test]
fn test_sigil_names() {
    assert!(BindingKind::Global.is_valid_name("$stdout"));
    assert!(BindingKind::Global.is_valid_name("$_x9"));
    assert!(!BindingKind::Global.is_valid_name("$"));
    assert!(!BindingKind::Global.is_valid_name("$0"));

    assert!(BindingKind::Instance.is_valid_name("@count"));
    assert!(!BindingKind::Instance.is_valid_name("@@count"));
    assert!(!BindingKind::Instance.is_valid_name("count"));

    assert!(BindingKind::Class.is_valid_name("@@count"));
    assert!(!BindingKind::Class.is_valid_name("@count"));
    assert!(!BindingKind::Class.is_valid_name("@@"));
}

#[test]
fn test_local_names() {
    assert!(BindingKind::Local.is_valid_name("x"));
    assert!(BindingKind::Local.is_valid_name("_tmp"));
    assert!(BindingKind::Local.is_valid_name("camelCase2"));
    assert!(!BindingKind::Local.is_valid_name("Camel"));
    assert!(!BindingKind::Local.is_valid_name("2x"));
    assert!(BindingKind::LocalGlobal.is_valid_name("x"));
}

#[test]
fn test_classify() {
    let b = LocalBehavior::Transient;
    assert_eq!(BindingKind::classify("@@k", b), Some(BindingKind::Class));
    assert_eq!(BindingKind::classify("@k", b), Some(BindingKind::Instance));
    assert_eq!(BindingKind::classify("$k", b), Some(BindingKind::Global));
    assert_eq!(BindingKind::classify("KEY", b), Some(BindingKind::Constant));
    assert_eq!(BindingKind::classify("k", b), Some(BindingKind::Local));
    assert_eq!(BindingKind::classify("9k", b), None);
    assert_eq!(BindingKind::classify("K", b), None);
}

#[test]
fn test_classify_global_behavior() {
    assert_eq!(
        BindingKind::classify("k", LocalBehavior::Global),
        Some(BindingKind::LocalGlobal)
    );
    assert_eq!(
        BindingKind::classify("k", LocalBehavior::Persistent),
        Some(BindingKind::Local)
    );
}

#[test]
fn test_local_global_name_mapping() {
    assert_eq!(BindingKind::LocalGlobal.guest_name("count"), "$count");
    assert_eq!(BindingKind::Constant.guest_name("MAX"), "MAX");
    assert_eq!(BindingKind::host_name_of_global("$count"), Some("count"));
    assert_eq!(BindingKind::host_name_of_global("$Count"), None);
    assert_eq!(BindingKind::host_name_of_global("count"), None);
}

#[test]
fn test_only_constants_bump_generation() {
    for kind in BindingKind::ALL {
        assert_eq!(kind.bumps_generation(), kind == BindingKind::Constant);
    }
}
