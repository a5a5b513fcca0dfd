//! Property-based tests for binding synchronization.
//!
//! Covers the name grammars and the pass-level guarantees that must hold for
//! any set of names:
//! 1. Injection is idempotent and bumps the generation once per constant
//! 2. `ARGV` never has more than one record
//! 3. A lazy by-name pull and an eager pass agree on the final value

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use std::collections::BTreeSet;

use ori_embed::sync::{inject_pending, retrieve_all, retrieve_by_name};
use ori_embed::{
    BindingGeneration, BindingKind, BindingMap, BindingRecord, EmbedConfig, GuestRuntime,
    LocalBehavior, ModelRuntime, ModelValue, ScopeId, SharedGeneration, SyncContext, ARGV,
};
use proptest::prelude::*;

/// Anchor for records whose scope does not matter.
const ANY_SCOPE: ScopeId = ScopeId::new(0);

// -- Strategies --

fn constant_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][A-Za-z_][A-Za-z_0-9]{0,12}")
        .expect("valid regex")
        .prop_filter("not ARGV", |s| s != ARGV)
}

fn identifier_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z_][A-Za-z_0-9]{0,12}").expect("valid regex")
}

fn local_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z_][A-Za-z_0-9]{0,12}").expect("valid regex")
}

/// One step of a random evaluation loop touching `ARGV`.
#[derive(Clone, Debug)]
enum ArgvStep {
    Eager { in_foo: bool },
    ByName { in_foo: bool },
    SetArgv(Vec<String>),
}

fn argv_step_strategy() -> impl Strategy<Value = ArgvStep> {
    prop_oneof![
        any::<bool>().prop_map(|in_foo| ArgvStep::Eager { in_foo }),
        any::<bool>().prop_map(|in_foo| ArgvStep::ByName { in_foo }),
        prop::collection::vec("[a-z]{1,4}", 0..3).prop_map(ArgvStep::SetArgv),
    ]
}

// -- Name grammars --

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_constant_grammar_accepted(name in constant_name_strategy()) {
        prop_assert!(BindingKind::Constant.is_valid_name(&name));
        prop_assert_eq!(
            BindingKind::classify(&name, LocalBehavior::Transient),
            Some(BindingKind::Constant)
        );
    }

    #[test]
    fn prop_constant_rejects_bad_first_char(name in "[a-z0-9_$@][A-Za-z_0-9]{0,12}") {
        prop_assert!(!BindingKind::Constant.is_valid_name(&name));
    }

    #[test]
    fn prop_constant_rejects_digit_second_char(name in "[A-Z][0-9][A-Za-z_0-9]{0,8}") {
        prop_assert!(!BindingKind::Constant.is_valid_name(&name));
    }

    #[test]
    fn prop_sigil_grammars_accepted(ident in identifier_strategy()) {
        let global = format!("${ident}");
        let instance = format!("@{ident}");
        let class = format!("@@{ident}");

        prop_assert!(BindingKind::Global.is_valid_name(&global));
        prop_assert!(BindingKind::Instance.is_valid_name(&instance));
        prop_assert!(BindingKind::Class.is_valid_name(&class));
        prop_assert!(!BindingKind::Instance.is_valid_name(&class));
        prop_assert_eq!(
            BindingKind::classify(&class, LocalBehavior::Transient),
            Some(BindingKind::Class)
        );
    }

    #[test]
    fn prop_local_grammar_accepted(name in local_name_strategy()) {
        prop_assert!(BindingKind::Local.is_valid_name(&name));
        prop_assert_eq!(
            BindingKind::classify(&name, LocalBehavior::Global),
            Some(BindingKind::LocalGlobal)
        );
        let guest = BindingKind::LocalGlobal.guest_name(&name);
        prop_assert_eq!(BindingKind::host_name_of_global(&guest), Some(name.as_str()));
    }

    /// The factory agrees with the validator on any input and never panics.
    #[test]
    fn prop_factory_matches_validator(name in any::<String>()) {
        for kind in BindingKind::ALL {
            let record = BindingRecord::host(kind, ANY_SCOPE, &name, 0_i64);
            prop_assert_eq!(record.is_some(), kind.is_valid_name(&name));
        }
    }
}

// -- Pass guarantees --

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_injection_is_idempotent(
        names in prop::collection::btree_set(constant_name_strategy(), 1..8),
        value in any::<i64>(),
    ) {
        let mut rt = ModelRuntime::new();
        let generation = SharedGeneration::new();
        let top = rt.top_level_scope();
        let mut map = BindingMap::new(EmbedConfig::new().lazy(false));
        for name in &names {
            map.upsert(BindingRecord::host(BindingKind::Constant, top, name, ModelValue::int(value)).unwrap());
        }

        inject_pending(&mut SyncContext::new(&mut rt, top, &generation), &mut map);
        let first: BTreeSet<String> = rt.constant_names(top).into_iter().collect();
        inject_pending(&mut SyncContext::new(&mut rt, top, &generation), &mut map);
        let second: BTreeSet<String> = rt.constant_names(top).into_iter().collect();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&first, &names);
        prop_assert_eq!(generation.current(), u64::try_from(names.len()).unwrap());
    }

    #[test]
    fn prop_argv_has_at_most_one_record(
        steps in prop::collection::vec(argv_step_strategy(), 1..12),
    ) {
        let mut rt = ModelRuntime::new();
        let generation = SharedGeneration::new();
        let top = rt.top_level_scope();
        let foo = rt.define_module("Foo");
        let mut map = BindingMap::new(EmbedConfig::new().lazy(false));

        for step in steps {
            match step {
                ArgvStep::Eager { in_foo } => {
                    let receiver = if in_foo { foo } else { top };
                    retrieve_all(&mut SyncContext::new(&mut rt, receiver, &generation), &mut map);
                }
                ArgvStep::ByName { in_foo } => {
                    let receiver = if in_foo { foo } else { top };
                    retrieve_by_name(
                        &mut SyncContext::new(&mut rt, receiver, &generation),
                        &mut map,
                        BindingKind::Constant,
                        ARGV,
                    );
                }
                ArgvStep::SetArgv(args) => rt.set_argv(args),
            }
            prop_assert!(map.names().filter(|name| *name == ARGV).count() <= 1);
        }
    }

    #[test]
    fn prop_lazy_and_eager_agree(name in constant_name_strategy(), value in any::<i64>()) {
        let mut rt = ModelRuntime::new();
        let generation = SharedGeneration::new();
        let foo = rt.define_module("Foo");
        rt.store_constant(foo, &name, ModelValue::int(value));

        let mut lazy = BindingMap::new(EmbedConfig::new());
        retrieve_all(&mut SyncContext::new(&mut rt, foo, &generation), &mut lazy);
        prop_assert!(lazy.is_empty());
        retrieve_by_name(
            &mut SyncContext::new(&mut rt, foo, &generation),
            &mut lazy,
            BindingKind::Constant,
            &name,
        );
        prop_assert_eq!(lazy.len(), 1);

        let mut eager = BindingMap::new(EmbedConfig::new().lazy(false));
        retrieve_all(&mut SyncContext::new(&mut rt, foo, &generation), &mut eager);

        prop_assert_eq!(
            lazy.lookup(foo, &name).unwrap().value(),
            eager.lookup(foo, &name).unwrap().value()
        );
    }
}
