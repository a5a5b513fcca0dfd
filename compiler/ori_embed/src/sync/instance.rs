//! Instance variables of the receiver.

use super::{observe, Placement, SyncContext};
use crate::guest::GuestRuntime;
use crate::kind::BindingKind;
use crate::record::{BindingHandle, BindingRecord};
use crate::registry::BindingMap;
use crate::scope::resolve_receiver;
use crate::ScopeId;

pub(super) fn store<R: GuestRuntime + ?Sized>(
    cx: &mut SyncContext<'_, R>,
    record: &BindingRecord<R::Value>,
    value: R::Value,
) -> Placement {
    let Some(receiver) = resolve_receiver(&*cx.runtime, record.anchor()) else {
        return Placement::Deferred;
    };
    cx.runtime.set_instance_variable(receiver, record.name(), value);
    Placement::Scope(receiver)
}

pub(super) fn retrieve_all<R: GuestRuntime + ?Sized>(
    cx: &mut SyncContext<'_, R>,
    map: &mut BindingMap<R::Value>,
) {
    let Some(receiver) = resolve_receiver(&*cx.runtime, cx.receiver) else {
        return;
    };
    for name in cx.runtime.instance_variable_names(receiver) {
        if let Some(value) = cx.runtime.get_instance_variable(receiver, &name) {
            observe(map, BindingKind::Instance, receiver, &name, value);
        }
    }
}

pub(super) fn retrieve_by_name<R: GuestRuntime + ?Sized>(
    cx: &mut SyncContext<'_, R>,
    map: &mut BindingMap<R::Value>,
    name: &str,
) -> Option<BindingHandle<R::Value>> {
    let receiver = resolve_receiver(&*cx.runtime, cx.receiver)?;
    let value = cx.runtime.get_instance_variable(receiver, name)?;
    observe(map, BindingKind::Instance, receiver, name, value)
}

pub(super) fn undefine<R: GuestRuntime + ?Sized>(
    cx: &mut SyncContext<'_, R>,
    anchor: ScopeId,
    name: &str,
    stored_in: Option<ScopeId>,
) -> bool {
    cx.runtime.remove_instance_variable(stored_in.unwrap_or(anchor), name).is_some()
}
