use super::*;
use pretty_assertions::assert_eq;

const TOP: ScopeId = ScopeId::new(0);

#[test]
fn test_host_factory_rejects_invalid_names() {
    assert!(BindingRecord::host(BindingKind::Constant, TOP, "max", 1).is_none());
    assert!(BindingRecord::host(BindingKind::Constant, TOP, "M", 1).is_none());
    assert!(BindingRecord::host(BindingKind::Instance, TOP, "x", 1).is_none());
    assert!(BindingRecord::host(BindingKind::Constant, TOP, "MAX", 1).is_some());
}

#[test]
fn test_host_record_is_pending() {
    let record = BindingRecord::host(BindingKind::Constant, TOP, "MAX", 10).unwrap();
    assert_eq!(record.provenance(), Provenance::HostAuthored);
    assert!(!record.is_materialized());
    assert!(record.is_pending());
    assert_eq!(record.value(), Some(&10));
    assert_eq!(record.guest_value(), None);
}

#[test]
fn test_observed_record_is_materialized() {
    let record = BindingRecord::observed(BindingKind::Constant, TOP, "BAR", 5).unwrap();
    assert_eq!(record.provenance(), Provenance::GuestObserved);
    assert!(record.is_materialized());
    assert!(!record.is_pending());
    assert_eq!(record.value(), Some(&5));
    assert_eq!(record.host_value(), None);
}

#[test]
fn test_injection_switches_to_guest_semantics() {
    let mut record = BindingRecord::host(BindingKind::Constant, TOP, "MAX", 10).unwrap();
    record.mark_injected(Some(ScopeId::new(3)));

    assert!(!record.is_pending());
    assert_eq!(record.provenance(), Provenance::GuestObserved);
    assert_eq!(record.stored_in(), Some(ScopeId::new(3)));
    assert_eq!(record.value(), Some(&10));

    // Later resyncs take the guest's value, not the host's
    record.observe(11);
    assert_eq!(record.value(), Some(&11));
    assert_eq!(record.host_value(), Some(&10));
}

#[test]
fn test_host_write_makes_record_pending_again() {
    let mut record = BindingRecord::observed(BindingKind::Global, TOP, "$x", 1).unwrap();
    record.set_host_value(2);
    assert!(record.is_pending());
    assert_eq!(record.value(), Some(&2));
}

#[test]
fn test_handle_shares_updates() {
    let handle = BindingHandle::new(
        BindingRecord::observed(BindingKind::Constant, TOP, "BAR", 5).unwrap(),
    );
    let held = handle.clone();
    handle.borrow_mut().observe(6);

    assert!(held.ptr_eq(&handle));
    assert_eq!(held.value(), Some(6));
}
