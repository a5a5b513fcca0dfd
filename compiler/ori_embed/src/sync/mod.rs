//! Synchronization engine.
//!
//! Moves values between the binding registry and the guest namespace around
//! each script unit:
//!
//! ```text
//! Idle -> Injecting -> Evaluating -> Resyncing -> Idle
//! ```
//!
//! `Resyncing` is skipped for lazy registries; those pull single names on
//! demand through [`retrieve_by_name`] instead.
//!
//! Guest-side misses are never errors here. A scope that is not defined yet
//! leaves the binding pending, and a name that does not exist yet is simply
//! not recorded.

mod class_var;
mod constant;
mod global;
mod instance;
mod local;

use crate::generation::BindingGeneration;
use crate::guest::GuestRuntime;
use crate::kind::BindingKind;
use crate::record::{BindingHandle, BindingRecord};
use crate::registry::BindingMap;
use crate::ScopeId;

/// Registry-wide position in the evaluation loop.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SyncPhase {
    #[default]
    Idle,
    /// Pending host values are being pushed into the guest.
    Injecting,
    /// The guest is running a unit; the registry is not touched.
    Evaluating,
    /// Live guest values are being pulled back.
    Resyncing,
}

/// Everything a pass needs besides the registry.
pub struct SyncContext<'a, R: GuestRuntime + ?Sized> {
    pub runtime: &'a mut R,
    /// The object the unit runs against.
    pub receiver: ScopeId,
    pub generation: &'a dyn BindingGeneration,
}

impl<'a, R: GuestRuntime + ?Sized> SyncContext<'a, R> {
    pub fn new(
        runtime: &'a mut R,
        receiver: ScopeId,
        generation: &'a dyn BindingGeneration,
    ) -> Self {
        SyncContext {
            runtime,
            receiver,
            generation,
        }
    }

    #[inline]
    pub(crate) fn top_level(&self) -> ScopeId {
        self.runtime.top_level_scope()
    }
}

/// Where an injection wrote its value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Placement {
    /// Written into a specific guest scope.
    Scope(ScopeId),
    /// Written into a process-wide namespace (globals, top-level locals).
    Unscoped,
    /// No target scope yet; retry on a later pass.
    Deferred,
}

/// Push every due record into the guest. Returns how many were written.
///
/// A record is due when it is pending, or when it is a top-level local
/// (those are pushed again before every unit).
#[tracing::instrument(level = "debug", skip_all, fields(receiver = %cx.receiver))]
pub fn inject_pending<R: GuestRuntime + ?Sized>(
    cx: &mut SyncContext<'_, R>,
    map: &mut BindingMap<R::Value>,
) -> usize {
    map.set_phase(SyncPhase::Injecting);
    let injected = BindingKind::ALL
        .into_iter()
        .map(|kind| kind.inject(cx, map))
        .sum();
    map.set_phase(SyncPhase::Idle);
    injected
}

/// Eager resync after a unit. No-op for lazy registries.
#[tracing::instrument(level = "debug", skip_all, fields(receiver = %cx.receiver))]
pub fn retrieve_all<R: GuestRuntime + ?Sized>(
    cx: &mut SyncContext<'_, R>,
    map: &mut BindingMap<R::Value>,
) {
    if map.is_lazy() {
        return;
    }
    map.set_phase(SyncPhase::Resyncing);
    for kind in map.local_behavior().retrieval_order() {
        kind.retrieve_all(cx, map);
    }
    map.set_phase(SyncPhase::Idle);
}

/// Pull one name of `kind` from the guest.
///
/// Returns the created or updated record, or `None` when the guest does not
/// define the name.
pub fn retrieve_by_name<R: GuestRuntime + ?Sized>(
    cx: &mut SyncContext<'_, R>,
    map: &mut BindingMap<R::Value>,
    kind: BindingKind,
    name: &str,
) -> Option<BindingHandle<R::Value>> {
    kind.retrieve_by_name(cx, map, name)
}

/// Drop the record for `name` under `anchor` and undefine it in the guest.
///
/// A name the registry never pulled is still undefined, found through the
/// lookup tiers of `kind` from `anchor`. Records the guest never held are
/// dropped without touching it. Returns the detached record, if any.
#[tracing::instrument(level = "debug", skip(cx, map))]
pub fn remove<R: GuestRuntime + ?Sized>(
    cx: &mut SyncContext<'_, R>,
    map: &mut BindingMap<R::Value>,
    kind: BindingKind,
    anchor: ScopeId,
    name: &str,
) -> Option<BindingHandle<R::Value>> {
    let handle = map.remove(anchor, name);
    let (kind, undefined) = match &handle {
        Some(handle) => {
            let record = handle.borrow();
            let undefined = record.guest_value().is_some()
                && record
                    .kind()
                    .undefine(cx, record.anchor(), name, record.stored_in());
            (record.kind(), undefined)
        }
        None => (kind, kind.undefine(cx, anchor, name, None)),
    };
    if undefined && kind.bumps_generation() {
        cx.generation.bump();
    }
    tracing::debug!(%kind, tracked = handle.is_some(), undefined, "removed binding");
    handle
}

impl BindingKind {
    /// Injection pass for this kind.
    pub fn inject<R: GuestRuntime + ?Sized>(
        self,
        cx: &mut SyncContext<'_, R>,
        map: &mut BindingMap<R::Value>,
    ) -> usize {
        let mut injected = 0;
        for handle in map.records_of(self) {
            let mut record = handle.borrow_mut();
            let due = record.is_pending() || self.reinjects_every_unit();
            if !due {
                continue;
            }
            let Some(value) = record.value().cloned() else {
                continue;
            };

            let placement = match self {
                BindingKind::Constant => constant::store(cx, &record, value),
                BindingKind::Instance => instance::store(cx, &record, value),
                BindingKind::Class => class_var::store(cx, &record, value),
                BindingKind::Global | BindingKind::LocalGlobal => global::store(cx, &record, value),
                BindingKind::Local => local::store(cx, &record, value),
            };

            match placement {
                Placement::Deferred => {
                    tracing::trace!(name = record.name(), "no target scope, left pending");
                }
                Placement::Scope(scope) => {
                    record.mark_injected(Some(scope));
                    injected += 1;
                }
                Placement::Unscoped => {
                    record.mark_injected(None);
                    injected += 1;
                }
            }
            if placement != Placement::Deferred && self.bumps_generation() {
                cx.generation.bump();
            }
        }
        injected
    }

    /// Eager resync pass for this kind.
    pub fn retrieve_all<R: GuestRuntime + ?Sized>(
        self,
        cx: &mut SyncContext<'_, R>,
        map: &mut BindingMap<R::Value>,
    ) {
        match self {
            BindingKind::Constant => constant::retrieve_all(cx, map),
            BindingKind::Instance => instance::retrieve_all(cx, map),
            BindingKind::Class => class_var::retrieve_all(cx, map),
            BindingKind::Global => global::retrieve_all(cx, map),
            BindingKind::LocalGlobal => global::retrieve_all_local_style(cx, map),
            BindingKind::Local => local::retrieve_all(cx, map),
        }
    }

    /// Lazy resync of one name for this kind.
    pub fn retrieve_by_name<R: GuestRuntime + ?Sized>(
        self,
        cx: &mut SyncContext<'_, R>,
        map: &mut BindingMap<R::Value>,
        name: &str,
    ) -> Option<BindingHandle<R::Value>> {
        if !self.is_valid_name(name) {
            return None;
        }
        match self {
            BindingKind::Constant => constant::retrieve_by_name(cx, map, name),
            BindingKind::Instance => instance::retrieve_by_name(cx, map, name),
            BindingKind::Class => class_var::retrieve_by_name(cx, map, name),
            BindingKind::Global | BindingKind::LocalGlobal => {
                global::retrieve_by_name(cx, map, self, name)
            }
            BindingKind::Local => local::retrieve_by_name(cx, map, name),
        }
    }

    /// Undefine the guest-side `name`. `stored_in` is where an injection
    /// wrote it, when known. Returns whether anything was removed.
    fn undefine<R: GuestRuntime + ?Sized>(
        self,
        cx: &mut SyncContext<'_, R>,
        anchor: ScopeId,
        name: &str,
        stored_in: Option<ScopeId>,
    ) -> bool {
        match self {
            BindingKind::Constant => constant::undefine(cx, anchor, name, stored_in),
            BindingKind::Instance => instance::undefine(cx, anchor, name, stored_in),
            BindingKind::Class => class_var::undefine(cx, anchor, name, stored_in),
            BindingKind::Global | BindingKind::LocalGlobal => global::undefine(cx, self, name),
            BindingKind::Local => local::undefine(cx, name),
        }
    }
}

/// Fold an observed guest value into the registry.
///
/// Updates the record for `(anchor, name)` in place, or creates a
/// guest-observed record. Pending host writes are left alone; they win
/// until they are injected.
fn observe<V: Clone>(
    map: &mut BindingMap<V>,
    kind: BindingKind,
    anchor: ScopeId,
    name: &str,
    value: V,
) -> Option<BindingHandle<V>> {
    if let Some(handle) = map.lookup(anchor, name).cloned() {
        {
            let mut record = handle.borrow_mut();
            if !record.is_pending() {
                record.observe(value);
            }
        }
        return Some(handle);
    }

    let record = BindingRecord::observed(kind, anchor, name, value)?;
    tracing::debug!(%kind, name, %anchor, "observed new binding");
    Some(map.upsert(record))
}
