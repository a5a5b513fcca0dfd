//! Binding records and host-held handles.
//!
//! A record is the unit of synchronized state: one named value, where it is
//! anchored in the guest, and which side last wrote it. Records are shared
//! through [`BindingHandle`] so resync passes update them in place and the
//! host's handles stay valid.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::kind::BindingKind;
use crate::ScopeId;

/// Which side holds the authoritative value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Provenance {
    /// Created or last written by the host; `host_value` is authoritative.
    HostAuthored,
    /// Last written by observing the guest; `guest_value` is authoritative.
    GuestObserved,
}

/// One synchronized binding.
#[derive(Clone, Debug)]
pub struct BindingRecord<V> {
    name: String,
    kind: BindingKind,
    anchor: ScopeId,
    host_value: Option<V>,
    guest_value: Option<V>,
    provenance: Provenance,
    materialized: bool,
    /// Scope the last injection wrote into.
    stored_in: Option<ScopeId>,
}

impl<V: Clone> BindingRecord<V> {
    /// Create a host-authored record, or `None` if `name` fails the kind's grammar.
    pub fn host(kind: BindingKind, anchor: ScopeId, name: &str, value: V) -> Option<Self> {
        if !kind.is_valid_name(name) {
            return None;
        }
        Some(BindingRecord {
            name: name.to_owned(),
            kind,
            anchor,
            host_value: Some(value),
            guest_value: None,
            provenance: Provenance::HostAuthored,
            materialized: false,
            stored_in: None,
        })
    }

    /// Create a record for a value found in the guest namespace.
    ///
    /// Observed records count as materialized: the guest already has them.
    pub fn observed(kind: BindingKind, anchor: ScopeId, name: &str, value: V) -> Option<Self> {
        if !kind.is_valid_name(name) {
            return None;
        }
        Some(BindingRecord {
            name: name.to_owned(),
            kind,
            anchor,
            host_value: None,
            guest_value: Some(value),
            provenance: Provenance::GuestObserved,
            materialized: true,
            stored_in: None,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> BindingKind {
        self.kind
    }

    #[inline]
    pub fn anchor(&self) -> ScopeId {
        self.anchor
    }

    #[inline]
    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    #[inline]
    pub fn is_materialized(&self) -> bool {
        self.materialized
    }

    /// Scope the last successful injection wrote into.
    #[inline]
    pub fn stored_in(&self) -> Option<ScopeId> {
        self.stored_in
    }

    /// Host-authored and not yet pushed into the guest.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.provenance == Provenance::HostAuthored && !self.materialized
    }

    /// The authoritative value for the current provenance.
    pub fn value(&self) -> Option<&V> {
        match self.provenance {
            Provenance::HostAuthored => self.host_value.as_ref(),
            Provenance::GuestObserved => self.guest_value.as_ref(),
        }
    }

    pub fn host_value(&self) -> Option<&V> {
        self.host_value.as_ref()
    }

    pub fn guest_value(&self) -> Option<&V> {
        self.guest_value.as_ref()
    }

    /// Host write. The record becomes pending until the next injection.
    pub fn set_host_value(&mut self, value: V) {
        self.host_value = Some(value);
        self.provenance = Provenance::HostAuthored;
        self.materialized = false;
    }

    /// Resync write from the live guest namespace.
    pub(crate) fn observe(&mut self, value: V) {
        self.guest_value = Some(value);
        self.provenance = Provenance::GuestObserved;
        self.materialized = true;
    }

    /// Record a successful injection into `scope`.
    ///
    /// From here on the guest is authoritative; the pushed value seeds
    /// `guest_value` until the next resync overwrites it.
    pub(crate) fn mark_injected(&mut self, scope: Option<ScopeId>) {
        if let Some(value) = self.value().cloned() {
            self.guest_value = Some(value);
        }
        self.provenance = Provenance::GuestObserved;
        self.materialized = true;
        self.stored_in = scope;
    }
}

/// Shared, single-threaded handle to a registry record.
///
/// The registry and every host consumer hold clones of the same handle, so
/// an in-place update is visible everywhere. Not `Send`: the registry is
/// driven by one evaluation loop.
#[repr(transparent)]
pub struct BindingHandle<V>(Rc<RefCell<BindingRecord<V>>>);

impl<V> BindingHandle<V> {
    /// Wrap a record.
    #[inline]
    pub fn new(record: BindingRecord<V>) -> Self {
        BindingHandle(Rc::new(RefCell::new(record)))
    }

    /// Borrow the record immutably.
    #[inline]
    pub fn borrow(&self) -> std::cell::Ref<'_, BindingRecord<V>> {
        self.0.borrow()
    }

    /// Borrow the record mutably.
    #[inline]
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, BindingRecord<V>> {
        self.0.borrow_mut()
    }

    /// Whether both handles point at the same record.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<V: Clone> BindingHandle<V> {
    /// Clone out the authoritative value.
    pub fn value(&self) -> Option<V> {
        self.borrow().value().cloned()
    }
}

impl<V> Clone for BindingHandle<V> {
    #[inline]
    fn clone(&self) -> Self {
        BindingHandle(Rc::clone(&self.0))
    }
}

impl<V: fmt::Debug> fmt::Debug for BindingHandle<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BindingHandle").field(&self.0).finish()
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests;
