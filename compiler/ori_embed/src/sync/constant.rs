//! Constant bindings.
//!
//! Constants are the only kind guest code caches lookups for, so every
//! write or undefine here bumps the binding generation (done by the caller).

use super::{observe, Placement, SyncContext};
use crate::guest::GuestRuntime;
use crate::kind::{BindingKind, ARGV};
use crate::record::{BindingHandle, BindingRecord};
use crate::registry::BindingMap;
use crate::scope::{resolve_lookup_scopes, resolve_receiver, resolve_store_scope};
use crate::ScopeId;

pub(super) fn store<R: GuestRuntime + ?Sized>(
    cx: &mut SyncContext<'_, R>,
    record: &BindingRecord<R::Value>,
    value: R::Value,
) -> Placement {
    let Some(scope) = resolve_store_scope(&*cx.runtime, record.anchor()) else {
        return Placement::Deferred;
    };
    cx.runtime.store_constant(scope, record.name(), value);
    Placement::Scope(scope)
}

/// Eager pass.
///
/// 1. `ARGV`, which always has exactly one record.
/// 2. Existing records against the superclass tier. That tier holds every
///    top-level constant of the process, so it is probed by name rather
///    than enumerated. Records under any anchor take the tier's value;
///    step 3 of a later pass against their own scope restores it.
/// 3. Every constant of the receiver's own scope.
/// 4. Every constant of the top-level scope, unless that is the receiver.
pub(super) fn retrieve_all<R: GuestRuntime + ?Sized>(
    cx: &mut SyncContext<'_, R>,
    map: &mut BindingMap<R::Value>,
) {
    retrieve_argv(cx, map);

    let top = cx.top_level();
    if let Some(parent) = cx.runtime.superclass_of(top) {
        for handle in map.records_of(BindingKind::Constant) {
            let mut record = handle.borrow_mut();
            if record.is_pending() || record.name() == ARGV {
                continue;
            }
            if let Some(value) = cx.runtime.get_constant(parent, record.name()) {
                record.observe(value);
            }
        }
    }

    if let Some(receiver) = resolve_receiver(&*cx.runtime, cx.receiver) {
        retrieve_scope(cx, map, receiver);
    }
    if cx.receiver != top {
        retrieve_scope(cx, map, top);
    }
}

/// Record every constant defined directly in `scope`, anchored at `scope`.
fn retrieve_scope<R: GuestRuntime + ?Sized>(
    cx: &SyncContext<'_, R>,
    map: &mut BindingMap<R::Value>,
    scope: ScopeId,
) {
    for name in cx.runtime.constant_names(scope) {
        if name == ARGV {
            continue;
        }
        if let Some(value) = cx.runtime.get_constant(scope, &name) {
            observe(map, BindingKind::Constant, scope, &name, value);
        }
    }
}

/// Lazy pass for one name.
///
/// Probes the lookup tiers in order and stops at the first hit. The record
/// is anchored at the receiver whichever tier answered.
pub(super) fn retrieve_by_name<R: GuestRuntime + ?Sized>(
    cx: &mut SyncContext<'_, R>,
    map: &mut BindingMap<R::Value>,
    name: &str,
) -> Option<BindingHandle<R::Value>> {
    if name == ARGV {
        return retrieve_argv(cx, map);
    }

    let value = resolve_lookup_scopes(&*cx.runtime, cx.receiver)
        .into_iter()
        .find_map(|scope| cx.runtime.get_constant(scope, name))?;
    observe(map, BindingKind::Constant, cx.receiver, name, value)
}

/// Create or update the single `ARGV` record.
///
/// Looked up at the top level and then its superclass, where launchers
/// define it. A missing or nil value leaves the registry untouched.
fn retrieve_argv<R: GuestRuntime + ?Sized>(
    cx: &mut SyncContext<'_, R>,
    map: &mut BindingMap<R::Value>,
) -> Option<BindingHandle<R::Value>> {
    let rt = &*cx.runtime;
    let top = rt.top_level_scope();
    let value = rt
        .get_constant(top, ARGV)
        .or_else(|| rt.superclass_of(top).and_then(|parent| rt.get_constant(parent, ARGV)))
        .filter(|value| !rt.is_nil(value))?;

    match map.first_named(ARGV).cloned() {
        Some(handle) => {
            {
                let mut record = handle.borrow_mut();
                if !record.is_pending() {
                    record.observe(value);
                }
            }
            Some(handle)
        }
        None => observe(map, BindingKind::Constant, top, ARGV, value),
    }
}

/// Undefine the constant where it was stored, or else at the first lookup
/// tier from `anchor` that defines it.
pub(super) fn undefine<R: GuestRuntime + ?Sized>(
    cx: &mut SyncContext<'_, R>,
    anchor: ScopeId,
    name: &str,
    stored_in: Option<ScopeId>,
) -> bool {
    if let Some(scope) = stored_in {
        return cx.runtime.remove_constant(scope, name).is_some();
    }

    let scopes = resolve_lookup_scopes(&*cx.runtime, anchor);
    scopes
        .into_iter()
        .any(|scope| cx.runtime.remove_constant(scope, name).is_some())
}
