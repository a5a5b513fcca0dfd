//! Top-level local variables.
//!
//! Each unit runs in its own local frame, so host locals are pushed before
//! every unit, not only while pending. Whether they are read back is up to
//! the local behavior: only `Persistent` retrieves them.

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
    cx.runtime.set_local(record.name(), value);
    Placement::Unscoped
}

pub(super) fn retrieve_all<R: GuestRuntime + ?Sized>(
    cx: &mut SyncContext<'_, R>,
    map: &mut BindingMap<R::Value>,
) {
    let top = cx.top_level();
    for name in cx.runtime.local_names() {
        if let Some(value) = cx.runtime.get_local(&name) {
            observe(map, BindingKind::Local, top, &name, value);
        }
    }
}

pub(super) fn retrieve_by_name<R: GuestRuntime + ?Sized>(
    cx: &mut SyncContext<'_, R>,
    map: &mut BindingMap<R::Value>,
    name: &str,
) -> Option<BindingHandle<R::Value>> {
    let value = cx.runtime.get_local(name)?;
    observe(map, BindingKind::Local, cx.top_level(), name, value)
}

pub(super) fn undefine<R: GuestRuntime + ?Sized>(
    cx: &mut SyncContext<'_, R>,
    name: &str,
) -> bool {
    cx.runtime.remove_local(name).is_some()
}
