//! Host-facing evaluation loop.
//!
//! A [`BindingSession`] owns the guest runtime and the binding registry and
//! drives the sync engine around each script unit. Hosts read and write
//! bindings by name; the session picks the kind from the name's sigil.

use crate::config::EmbedConfig;
use crate::errors::{BindingError, BindingResult};
use crate::generation::{BindingGeneration, SharedGeneration};
use crate::guest::GuestRuntime;
use crate::kind::{BindingKind, ARGV};
use crate::record::{BindingHandle, BindingRecord};
use crate::registry::BindingMap;
use crate::scope::resolve_lookup_scopes;
use crate::sync::{self, SyncContext, SyncPhase};
use crate::ScopeId;

/// Host side of an embedded guest.
pub struct BindingSession<R: GuestRuntime, G: BindingGeneration = SharedGeneration> {
    runtime: R,
    map: BindingMap<R::Value>,
    generation: G,
}

impl<R: GuestRuntime> BindingSession<R> {
    /// Create a session with a fresh generation counter.
    pub fn new(runtime: R, config: EmbedConfig) -> Self {
        Self::with_generation(runtime, config, SharedGeneration::new())
    }
}

impl<R: GuestRuntime, G: BindingGeneration> BindingSession<R, G> {
    /// Create a session bumping the given generation counter, typically one
    /// shared with the guest's lookup caches.
    pub fn with_generation(runtime: R, config: EmbedConfig, generation: G) -> Self {
        tracing::debug!(?config, "binding session");
        BindingSession {
            runtime,
            map: BindingMap::new(config),
            generation,
        }
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Direct guest access, standing in for guest code between units.
    pub fn runtime_mut(&mut self) -> &mut R {
        &mut self.runtime
    }

    pub fn map(&self) -> &BindingMap<R::Value> {
        &self.map
    }

    pub fn generation(&self) -> &G {
        &self.generation
    }

    /// The top-level object, the default receiver.
    pub fn top_level(&self) -> ScopeId {
        self.runtime.top_level_scope()
    }

    /// Write a binding against the top-level object.
    pub fn put(&mut self, name: &str, value: R::Value) -> BindingResult<BindingHandle<R::Value>> {
        self.put_at(self.top_level(), name, value)
    }

    /// Write a binding against `receiver`, picking the kind from the name.
    pub fn put_at(
        &mut self,
        receiver: ScopeId,
        name: &str,
        value: R::Value,
    ) -> BindingResult<BindingHandle<R::Value>> {
        let kind = self.classify(name)?;
        self.put_kind(kind, receiver, name, value)
    }

    /// Write a binding of an explicit kind.
    ///
    /// The value stays pending until the next injection. Writing a name that
    /// already has a record overwrites it in place.
    pub fn put_kind(
        &mut self,
        kind: BindingKind,
        receiver: ScopeId,
        name: &str,
        value: R::Value,
    ) -> BindingResult<BindingHandle<R::Value>> {
        if !kind.is_valid_name(name) {
            return Err(BindingError::invalid_name(kind, name));
        }
        let anchor = self.anchor_for(kind, receiver, name);

        if let Some(handle) = self.map.lookup(anchor, name) {
            handle.borrow_mut().set_host_value(value);
            return Ok(handle.clone());
        }
        let record = BindingRecord::host(kind, anchor, name, value)
            .ok_or_else(|| BindingError::invalid_name(kind, name))?;
        tracing::debug!(%kind, name, %anchor, "host binding");
        Ok(self.map.upsert(record))
    }

    /// Read a binding against the top-level object.
    pub fn get(&mut self, name: &str) -> BindingResult<Option<R::Value>> {
        self.get_at(self.top_level(), name)
    }

    /// Read a binding against `receiver`.
    pub fn get_at(&mut self, receiver: ScopeId, name: &str) -> BindingResult<Option<R::Value>> {
        Ok(self
            .handle_at(receiver, name)?
            .and_then(|handle| handle.value()))
    }

    /// The record for `name` under `receiver`.
    ///
    /// Lazy sessions pull a missing name from the guest on first access.
    /// Eager ones only report what the last resync saw; a constant resolves
    /// through the receiver's lookup tiers the way guest code would see it.
    pub fn handle_at(
        &mut self,
        receiver: ScopeId,
        name: &str,
    ) -> BindingResult<Option<BindingHandle<R::Value>>> {
        let kind = self.classify(name)?;
        let anchor = self.anchor_for(kind, receiver, name);
        if let Some(handle) = self.map.lookup(anchor, name) {
            return Ok(Some(handle.clone()));
        }
        if self.map.is_lazy() {
            return Ok(self.retrieve(kind, receiver, name));
        }
        if kind != BindingKind::Constant {
            return Ok(None);
        }
        Ok(resolve_lookup_scopes(&self.runtime, receiver)
            .into_iter()
            .find_map(|scope| self.map.lookup(scope, name))
            .cloned())
    }

    /// Pull `name` from the guest now, whatever the laziness.
    pub fn refresh(
        &mut self,
        receiver: ScopeId,
        name: &str,
    ) -> BindingResult<Option<BindingHandle<R::Value>>> {
        let kind = self.classify(name)?;
        Ok(self.retrieve(kind, receiver, name))
    }

    /// Drop the binding for `name` under `receiver` and undefine it in the
    /// guest, whether or not the registry had pulled it yet. Returns the
    /// detached record, if there was one.
    pub fn remove(
        &mut self,
        receiver: ScopeId,
        name: &str,
    ) -> BindingResult<Option<BindingHandle<R::Value>>> {
        let kind = self.classify(name)?;
        let anchor = self.anchor_for(kind, receiver, name);
        let mut cx = SyncContext::new(&mut self.runtime, receiver, &self.generation);
        Ok(sync::remove(&mut cx, &mut self.map, kind, anchor, name))
    }

    /// Push pending bindings into the guest.
    pub fn inject_pending(&mut self, receiver: ScopeId) -> usize {
        let mut cx = SyncContext::new(&mut self.runtime, receiver, &self.generation);
        sync::inject_pending(&mut cx, &mut self.map)
    }

    /// Eager resync. No-op for lazy sessions.
    pub fn retrieve_all(&mut self, receiver: ScopeId) {
        let mut cx = SyncContext::new(&mut self.runtime, receiver, &self.generation);
        sync::retrieve_all(&mut cx, &mut self.map);
    }

    /// Run one script unit against `receiver`.
    ///
    /// Pending bindings are injected first; afterwards every kind is
    /// resynced unless the session is lazy.
    #[tracing::instrument(level = "debug", skip_all, fields(receiver = %receiver))]
    pub fn run_unit<T>(&mut self, receiver: ScopeId, unit: impl FnOnce(&mut R) -> T) -> T {
        self.inject_pending(receiver);

        self.map.set_phase(SyncPhase::Evaluating);
        let result = unit(&mut self.runtime);

        self.retrieve_all(receiver);
        self.map.set_phase(SyncPhase::Idle);
        result
    }

    fn retrieve(
        &mut self,
        kind: BindingKind,
        receiver: ScopeId,
        name: &str,
    ) -> Option<BindingHandle<R::Value>> {
        let mut cx = SyncContext::new(&mut self.runtime, receiver, &self.generation);
        sync::retrieve_by_name(&mut cx, &mut self.map, kind, name)
    }

    fn classify(&self, name: &str) -> BindingResult<BindingKind> {
        BindingKind::classify(name, self.map.local_behavior())
            .ok_or_else(|| BindingError::unclassified_name(name))
    }

    /// Registry anchor for a host request.
    ///
    /// Receiver-scoped kinds anchor at the receiver. Process-wide kinds and
    /// `ARGV` anchor at the top level.
    fn anchor_for(&self, kind: BindingKind, receiver: ScopeId, name: &str) -> ScopeId {
        match kind {
            BindingKind::Constant if name == ARGV => self.top_level(),
            BindingKind::Constant | BindingKind::Instance | BindingKind::Class => receiver,
            BindingKind::Global | BindingKind::LocalGlobal | BindingKind::Local => {
                self.top_level()
            }
        }
    }
}
