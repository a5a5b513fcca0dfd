//! Globals, and local-style names backed by globals.
//!
//! Both live in the process-wide global table, so records are anchored at
//! the top-level scope. A `LocalGlobal` record named `count` is the guest
//! global `$count`.

use super::{observe, Placement, SyncContext};
use crate::guest::GuestRuntime;
use crate::kind::BindingKind;
use crate::record::{BindingHandle, BindingRecord};
use crate::registry::BindingMap;

pub(super) fn store<R: GuestRuntime + ?Sized>(
    cx: &mut SyncContext<'_, R>,
    record: &BindingRecord<R::Value>,
    value: R::Value,
) -> Placement {
    let guest_name = record.kind().guest_name(record.name());
    cx.runtime.set_global(&guest_name, value);
    Placement::Unscoped
}

/// Mirror every user global. Globals the guest predefines are skipped.
pub(super) fn retrieve_all<R: GuestRuntime + ?Sized>(
    cx: &mut SyncContext<'_, R>,
    map: &mut BindingMap<R::Value>,
) {
    let top = cx.top_level();
    for name in cx.runtime.global_names() {
        if cx.runtime.is_predefined_global(&name) {
            continue;
        }
        if let Some(value) = cx.runtime.get_global(&name) {
            observe(map, BindingKind::Global, top, &name, value);
        }
    }
}

/// Mirror user globals under their local-style host names. Globals whose
/// name has no local-style form (`$Foo`) are not tracked.
pub(super) fn retrieve_all_local_style<R: GuestRuntime + ?Sized>(
    cx: &mut SyncContext<'_, R>,
    map: &mut BindingMap<R::Value>,
) {
    let top = cx.top_level();
    for guest_name in cx.runtime.global_names() {
        if cx.runtime.is_predefined_global(&guest_name) {
            continue;
        }
        let Some(host_name) = BindingKind::host_name_of_global(&guest_name) else {
            continue;
        };
        if let Some(value) = cx.runtime.get_global(&guest_name) {
            observe(map, BindingKind::LocalGlobal, top, host_name, value);
        }
    }
}

pub(super) fn retrieve_by_name<R: GuestRuntime + ?Sized>(
    cx: &mut SyncContext<'_, R>,
    map: &mut BindingMap<R::Value>,
    kind: BindingKind,
    name: &str,
) -> Option<BindingHandle<R::Value>> {
    let value = cx.runtime.get_global(&kind.guest_name(name))?;
    observe(map, kind, cx.top_level(), name, value)
}

pub(super) fn undefine<R: GuestRuntime + ?Sized>(
    cx: &mut SyncContext<'_, R>,
    kind: BindingKind,
    name: &str,
) -> bool {
    cx.runtime.remove_global(&kind.guest_name(name)).is_some()
}
