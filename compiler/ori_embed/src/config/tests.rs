use super::*;
use pretty_assertions::assert_eq;

fn lookup_from<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
    move |key| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| (*v).to_owned())
    }
}

#[test]
fn test_defaults() {
    let config = EmbedConfig::default();
    assert!(config.lazy);
    assert_eq!(config.local_behavior, LocalBehavior::Transient);
}

#[test]
fn test_builder() {
    let config = EmbedConfig::new()
        .lazy(false)
        .local_behavior(LocalBehavior::Persistent);
    assert_eq!(
        config,
        EmbedConfig {
            lazy: false,
            local_behavior: LocalBehavior::Persistent,
        }
    );
}

#[test]
fn test_from_lookup_unset_keeps_defaults() {
    let config = EmbedConfig::from_lookup(lookup_from(&[]));
    assert_eq!(config, Ok(EmbedConfig::new()));
}

#[test]
fn test_from_lookup_overrides() {
    let config = EmbedConfig::from_lookup(lookup_from(&[
        (LAZY_VAR, "0"),
        (LOCAL_BEHAVIOR_VAR, " Global "),
    ]));
    assert_eq!(
        config,
        Ok(EmbedConfig::new()
            .lazy(false)
            .local_behavior(LocalBehavior::Global))
    );
}

#[test]
fn test_from_lookup_rejects_garbage() {
    let err = EmbedConfig::from_lookup(lookup_from(&[(LAZY_VAR, "sometimes")]));
    assert_eq!(err, Err(BindingError::config(LAZY_VAR, "sometimes")));

    let err = EmbedConfig::from_lookup(lookup_from(&[(LOCAL_BEHAVIOR_VAR, "bsf")]));
    assert!(matches!(err, Err(BindingError::Config { .. })));
}

#[test]
fn test_retrieval_order() {
    assert_eq!(
        LocalBehavior::Transient.retrieval_order().last(),
        Some(&BindingKind::Constant)
    );
    assert_eq!(
        LocalBehavior::Persistent.retrieval_order().first(),
        Some(&BindingKind::Local)
    );
    assert_eq!(
        LocalBehavior::Global.retrieval_order(),
        &[BindingKind::LocalGlobal]
    );
}
