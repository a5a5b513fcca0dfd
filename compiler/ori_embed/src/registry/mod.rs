//! Binding registry.
//!
//! Ordered store of binding records keyed by `(anchor, name)`. The same name
//! may exist under several anchors; those are distinct bindings, never
//! aliases. Insertion order is preserved for host-visible iteration.

use indexmap::{Equivalent, IndexMap};
use rustc_hash::{FxBuildHasher, FxHashMap};
use smallvec::SmallVec;

use crate::config::{EmbedConfig, LocalBehavior};
use crate::kind::BindingKind;
use crate::record::{BindingHandle, BindingRecord};
use crate::sync::SyncPhase;
use crate::ScopeId;

/// Owned registry key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct BindingKey {
    anchor: ScopeId,
    name: String,
}

/// Borrowed form of [`BindingKey`] for allocation-free lookups.
///
/// Field order and types hash identically to the owned key.
#[derive(Hash)]
struct BindingKeyRef<'a> {
    anchor: ScopeId,
    name: &'a str,
}

impl Equivalent<BindingKey> for BindingKeyRef<'_> {
    fn equivalent(&self, key: &BindingKey) -> bool {
        self.anchor == key.anchor && self.name == key.name
    }
}

/// The registry of synchronized bindings.
pub struct BindingMap<V> {
    entries: IndexMap<BindingKey, BindingHandle<V>, FxBuildHasher>,
    /// Anchors holding each name, in insertion order.
    by_name: FxHashMap<String, SmallVec<[ScopeId; 2]>>,
    config: EmbedConfig,
    phase: SyncPhase,
}

impl<V: Clone> BindingMap<V> {
    /// Create an empty registry. The configuration is immutable afterwards.
    pub fn new(config: EmbedConfig) -> Self {
        BindingMap {
            entries: IndexMap::default(),
            by_name: FxHashMap::default(),
            config,
            phase: SyncPhase::Idle,
        }
    }

    #[inline]
    pub fn is_lazy(&self) -> bool {
        self.config.lazy
    }

    #[inline]
    pub fn local_behavior(&self) -> LocalBehavior {
        self.config.local_behavior
    }

    #[inline]
    pub fn config(&self) -> &EmbedConfig {
        &self.config
    }

    /// Where the surrounding evaluation loop currently is.
    #[inline]
    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    #[inline]
    pub(crate) fn set_phase(&mut self, phase: SyncPhase) {
        tracing::trace!(from = ?self.phase, to = ?phase, "sync phase");
        self.phase = phase;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any anchor holds a binding called `name`.
    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// All records in insertion order.
    pub fn records(&self) -> impl Iterator<Item = &BindingHandle<V>> {
        self.entries.values()
    }

    /// All names in insertion order, parallel to [`records`](Self::records).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|key| key.name.as_str())
    }

    /// The record for `name` under `anchor`.
    pub fn lookup(&self, anchor: ScopeId, name: &str) -> Option<&BindingHandle<V>> {
        self.entries.get(&BindingKeyRef { anchor, name })
    }

    /// The earliest-inserted record called `name`, whatever its anchor.
    pub fn first_named(&self, name: &str) -> Option<&BindingHandle<V>> {
        let anchor = *self.by_name.get(name)?.first()?;
        self.lookup(anchor, name)
    }

    /// Anchors holding a record called `name`, in insertion order.
    pub fn anchors_of(&self, name: &str) -> &[ScopeId] {
        self.by_name.get(name).map_or(&[], |anchors| anchors.as_slice())
    }

    /// Insert `record`, or overwrite the record with the same `(anchor, name)`.
    ///
    /// Overwriting keeps the existing handle so host-held clones see the
    /// new contents.
    pub fn upsert(&mut self, record: BindingRecord<V>) -> BindingHandle<V> {
        let anchor = record.anchor();
        let name = record.name().to_owned();
        if let Some(handle) = self.lookup(anchor, &name) {
            let handle = handle.clone();
            *handle.borrow_mut() = record;
            return handle;
        }

        let handle = BindingHandle::new(record);
        self.by_name.entry(name.clone()).or_default().push(anchor);
        self.entries
            .insert(BindingKey { anchor, name }, handle.clone());
        handle
    }

    /// Drop the record for `name` under `anchor`.
    pub fn remove(&mut self, anchor: ScopeId, name: &str) -> Option<BindingHandle<V>> {
        let handle = self.entries.shift_remove(&BindingKeyRef { anchor, name })?;
        if let Some(anchors) = self.by_name.get_mut(name) {
            anchors.retain(|a| *a != anchor);
            if anchors.is_empty() {
                self.by_name.remove(name);
            }
        }
        Some(handle)
    }

    /// Snapshot of the handles of one kind, in insertion order.
    ///
    /// Passes iterate a snapshot so they can upsert while walking.
    pub fn records_of(&self, kind: BindingKind) -> Vec<BindingHandle<V>> {
        self.entries
            .values()
            .filter(|handle| handle.borrow().kind() == kind)
            .cloned()
            .collect()
    }
}
