//! Scope resolution.
//!
//! Decides where a constant is written and where it is looked up. The guest
//! keeps user-defined top-level constants one level above the top-level
//! object, so lookups walk three tiers.

use smallvec::SmallVec;

use crate::guest::GuestRuntime;
use crate::ScopeId;

/// Lookup tiers, most specific first. Never more than three.
pub type LookupScopes = SmallVec<[ScopeId; 3]>;

/// The receiver, if the guest has defined its scope yet.
#[inline]
pub fn resolve_receiver<R: GuestRuntime + ?Sized>(rt: &R, receiver: ScopeId) -> Option<ScopeId> {
    rt.is_scope_defined(receiver).then_some(receiver)
}

/// Scope a constant injection writes into.
///
/// The module or class active at the current execution point wins, then the
/// receiver's scope. `None` means there is no target yet; the caller leaves
/// the binding pending and retries on a later pass.
pub fn resolve_store_scope<R: GuestRuntime + ?Sized>(rt: &R, receiver: ScopeId) -> Option<ScopeId> {
    rt.current_execution_scope()
        .or_else(|| resolve_receiver(rt, receiver))
}

/// Scopes probed for a constant, most specific first.
///
/// 1. the receiver's own scope
/// 2. the top-level scope
/// 3. the superclass of the top-level scope
///
/// A name found in an earlier tier shadows the same name in a later one.
/// Duplicate tiers (receiver is the top level) are collapsed.
pub fn resolve_lookup_scopes<R: GuestRuntime + ?Sized>(rt: &R, receiver: ScopeId) -> LookupScopes {
    let top = rt.top_level_scope();
    let mut scopes = LookupScopes::new();

    let mut push = |scope: ScopeId| {
        if !scopes.contains(&scope) {
            scopes.push(scope);
        }
    };

    if let Some(receiver) = resolve_receiver(rt, receiver) {
        push(receiver);
    }
    push(top);
    if let Some(parent) = rt.superclass_of(top) {
        push(parent);
    }

    scopes
}
