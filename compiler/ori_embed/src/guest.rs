//! The guest runtime seen from the engine.
//!
//! The engine only observes and injects into the guest namespace. Everything
//! it needs is behind this trait: scope topology, the constant tables, and
//! the namespaces of the sibling binding kinds. Lookups are local to the
//! scope they are given; walking the hierarchy is the resolver's job.

use std::fmt;

use crate::ScopeId;

/// Namespace access for an embedded guest interpreter.
pub trait GuestRuntime {
    /// Guest value representation. Values handed to the engine are already
    /// converted; the engine never marshals.
    type Value: Clone + fmt::Debug;

    // Scope topology

    /// The top-level object's scope.
    fn top_level_scope(&self) -> ScopeId;

    /// Parent of `scope` in the guest's scope hierarchy.
    fn superclass_of(&self, scope: ScopeId) -> Option<ScopeId>;

    /// Module or class active at the current execution point, if any.
    fn current_execution_scope(&self) -> Option<ScopeId>;

    /// Whether the guest has defined `scope` yet.
    fn is_scope_defined(&self, scope: ScopeId) -> bool;

    /// Whether `value` is the guest's nil.
    fn is_nil(&self, value: &Self::Value) -> bool;

    // Constants

    /// Constant names defined directly in `scope`, in guest order.
    fn constant_names(&self, scope: ScopeId) -> Vec<String>;

    /// Constant defined directly in `scope`.
    fn get_constant(&self, scope: ScopeId, name: &str) -> Option<Self::Value>;

    /// Define or overwrite a constant in `scope`.
    fn store_constant(&mut self, scope: ScopeId, name: &str, value: Self::Value);

    /// Undefine a constant in `scope`, returning the old value.
    fn remove_constant(&mut self, scope: ScopeId, name: &str) -> Option<Self::Value>;

    // Instance variables

    /// Instance variable names (with `@`) of `receiver`.
    fn instance_variable_names(&self, receiver: ScopeId) -> Vec<String>;

    fn get_instance_variable(&self, receiver: ScopeId, name: &str) -> Option<Self::Value>;

    fn set_instance_variable(&mut self, receiver: ScopeId, name: &str, value: Self::Value);

    fn remove_instance_variable(&mut self, receiver: ScopeId, name: &str) -> Option<Self::Value>;

    // Class variables

    /// Class variable names (with `@@`) of `scope`.
    fn class_variable_names(&self, scope: ScopeId) -> Vec<String>;

    fn get_class_variable(&self, scope: ScopeId, name: &str) -> Option<Self::Value>;

    fn set_class_variable(&mut self, scope: ScopeId, name: &str, value: Self::Value);

    fn remove_class_variable(&mut self, scope: ScopeId, name: &str) -> Option<Self::Value>;

    // Globals

    /// Global names (with `$`).
    fn global_names(&self) -> Vec<String>;

    fn get_global(&self, name: &str) -> Option<Self::Value>;

    fn set_global(&mut self, name: &str, value: Self::Value);

    fn remove_global(&mut self, name: &str) -> Option<Self::Value>;

    /// Globals the guest defines for itself (`$stdout`, `$0`, ...).
    /// They are never mirrored into the registry.
    fn is_predefined_global(&self, _name: &str) -> bool {
        false
    }

    // Top-level locals

    /// Local names of the top-level frame.
    fn local_names(&self) -> Vec<String>;

    fn get_local(&self, name: &str) -> Option<Self::Value>;

    fn set_local(&mut self, name: &str, value: Self::Value);

    fn remove_local(&mut self, name: &str) -> Option<Self::Value>;
}
