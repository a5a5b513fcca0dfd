//! In-memory guest runtime.
//!
//! A small stand-in for a real interpreter: a table of modules with
//! superclass links, per-module constants and variables, process-wide
//! globals and one top-level local frame. It evaluates nothing; callers
//! mutate it directly to play the part of guest code.
//!
//! Layout mirrors the usual dynamic-language object model:
//!
//! ```text
//! Object  (user-defined top-level constants live here)
//!   ^
//!   | superclass
//! main    (top-level object, default receiver)
//! ```

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};

use crate::guest::GuestRuntime;
use crate::ScopeId;

type Table = IndexMap<String, ModelValue, FxBuildHasher>;

/// Value held by the model runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModelValue {
    Nil,
    Int(i64),
    Str(String),
    List(Vec<ModelValue>),
}

impl ModelValue {
    #[inline]
    pub fn int(n: i64) -> Self {
        ModelValue::Int(n)
    }

    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        ModelValue::Str(s.into())
    }

    pub fn list(items: impl IntoIterator<Item = ModelValue>) -> Self {
        ModelValue::List(items.into_iter().collect())
    }
}

/// One module or class.
#[derive(Clone, Debug)]
struct Module {
    name: String,
    superclass: Option<ScopeId>,
    /// Reserved modules have an id but the guest has not evaluated their
    /// definition yet.
    defined: bool,
    constants: Table,
    class_variables: Table,
    instance_variables: Table,
}

impl Module {
    fn new(name: &str, superclass: Option<ScopeId>, defined: bool) -> Self {
        Module {
            name: name.to_owned(),
            superclass,
            defined,
            constants: Table::default(),
            class_variables: Table::default(),
            instance_variables: Table::default(),
        }
    }
}

/// Globals every fresh runtime defines for itself.
const PREDEFINED_GLOBALS: [(&str, &str); 2] = [("$0", "main"), ("$stdout", "<stdout>")];

/// In-memory implementation of [`GuestRuntime`].
#[derive(Clone, Debug)]
pub struct ModelRuntime {
    modules: Vec<Module>,
    object: ScopeId,
    top: ScopeId,
    current: Option<ScopeId>,
    globals: Table,
    predefined_globals: FxHashSet<String>,
    locals: Table,
}

impl ModelRuntime {
    /// Create a runtime with `Object`, the top-level object, and the
    /// predefined globals.
    pub fn new() -> Self {
        let mut rt = ModelRuntime {
            modules: Vec::new(),
            object: ScopeId::new(0),
            top: ScopeId::new(0),
            current: None,
            globals: Table::default(),
            predefined_globals: FxHashSet::default(),
            locals: Table::default(),
        };
        rt.object = rt.push_module("Object", None, true);
        rt.top = rt.push_module("main", Some(rt.object), true);

        for (name, value) in PREDEFINED_GLOBALS {
            rt.globals.insert(name.to_owned(), ModelValue::string(value));
            rt.predefined_globals.insert(name.to_owned());
        }
        rt
    }

    /// The root scope where top-level constants live.
    #[inline]
    pub fn object_scope(&self) -> ScopeId {
        self.object
    }

    /// Define a module whose superclass is `Object`.
    pub fn define_module(&mut self, name: &str) -> ScopeId {
        self.push_module(name, Some(self.object), true)
    }

    /// Allocate a module id the guest has not defined yet.
    pub fn reserve_module(&mut self, name: &str) -> ScopeId {
        self.push_module(name, Some(self.object), false)
    }

    /// Finish the definition of a reserved module. Returns `false` for an
    /// unknown id.
    pub fn define(&mut self, scope: ScopeId) -> bool {
        match self.module_mut(scope) {
            Some(module) => {
                module.defined = true;
                true
            }
            None => false,
        }
    }

    /// Name the module was created with.
    pub fn module_name(&self, scope: ScopeId) -> Option<&str> {
        self.module(scope).map(|module| module.name.as_str())
    }

    /// Enter or leave a module body.
    pub fn set_current_execution_scope(&mut self, scope: Option<ScopeId>) {
        self.current = scope;
    }

    /// Set the argument vector the way a launcher would.
    pub fn set_argv<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv = ModelValue::list(args.into_iter().map(ModelValue::string));
        self.store_constant(self.object, crate::kind::ARGV, argv);
    }

    /// Drop the top-level local frame, as a fresh unit would.
    pub fn clear_locals(&mut self) {
        self.locals.clear();
    }

    fn push_module(&mut self, name: &str, superclass: Option<ScopeId>, defined: bool) -> ScopeId {
        let raw = u32::try_from(self.modules.len()).unwrap_or(u32::MAX);
        self.modules.push(Module::new(name, superclass, defined));
        ScopeId::new(raw)
    }

    fn module(&self, scope: ScopeId) -> Option<&Module> {
        self.modules.get(scope.raw() as usize)
    }

    fn module_mut(&mut self, scope: ScopeId) -> Option<&mut Module> {
        self.modules.get_mut(scope.raw() as usize)
    }
}

impl Default for ModelRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl GuestRuntime for ModelRuntime {
    type Value = ModelValue;

    fn top_level_scope(&self) -> ScopeId {
        self.top
    }

    fn superclass_of(&self, scope: ScopeId) -> Option<ScopeId> {
        self.module(scope).and_then(|module| module.superclass)
    }

    fn current_execution_scope(&self) -> Option<ScopeId> {
        self.current
    }

    fn is_scope_defined(&self, scope: ScopeId) -> bool {
        self.module(scope).is_some_and(|module| module.defined)
    }

    fn is_nil(&self, value: &ModelValue) -> bool {
        matches!(value, ModelValue::Nil)
    }

    fn constant_names(&self, scope: ScopeId) -> Vec<String> {
        self.module(scope)
            .map(|module| module.constants.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn get_constant(&self, scope: ScopeId, name: &str) -> Option<ModelValue> {
        self.module(scope)?.constants.get(name).cloned()
    }

    fn store_constant(&mut self, scope: ScopeId, name: &str, value: ModelValue) {
        if let Some(module) = self.module_mut(scope) {
            module.constants.insert(name.to_owned(), value);
        }
    }

    fn remove_constant(&mut self, scope: ScopeId, name: &str) -> Option<ModelValue> {
        self.module_mut(scope)?.constants.shift_remove(name)
    }

    fn instance_variable_names(&self, receiver: ScopeId) -> Vec<String> {
        self.module(receiver)
            .map(|module| module.instance_variables.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn get_instance_variable(&self, receiver: ScopeId, name: &str) -> Option<ModelValue> {
        self.module(receiver)?.instance_variables.get(name).cloned()
    }

    fn set_instance_variable(&mut self, receiver: ScopeId, name: &str, value: ModelValue) {
        if let Some(module) = self.module_mut(receiver) {
            module.instance_variables.insert(name.to_owned(), value);
        }
    }

    fn remove_instance_variable(&mut self, receiver: ScopeId, name: &str) -> Option<ModelValue> {
        self.module_mut(receiver)?
            .instance_variables
            .shift_remove(name)
    }

    fn class_variable_names(&self, scope: ScopeId) -> Vec<String> {
        self.module(scope)
            .map(|module| module.class_variables.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn get_class_variable(&self, scope: ScopeId, name: &str) -> Option<ModelValue> {
        self.module(scope)?.class_variables.get(name).cloned()
    }

    fn set_class_variable(&mut self, scope: ScopeId, name: &str, value: ModelValue) {
        if let Some(module) = self.module_mut(scope) {
            module.class_variables.insert(name.to_owned(), value);
        }
    }

    fn remove_class_variable(&mut self, scope: ScopeId, name: &str) -> Option<ModelValue> {
        self.module_mut(scope)?.class_variables.shift_remove(name)
    }

    fn global_names(&self) -> Vec<String> {
        self.globals.keys().cloned().collect()
    }

    fn get_global(&self, name: &str) -> Option<ModelValue> {
        self.globals.get(name).cloned()
    }

    fn set_global(&mut self, name: &str, value: ModelValue) {
        self.globals.insert(name.to_owned(), value);
    }

    fn remove_global(&mut self, name: &str) -> Option<ModelValue> {
        self.globals.shift_remove(name)
    }

    fn is_predefined_global(&self, name: &str) -> bool {
        self.predefined_globals.contains(name)
    }

    fn local_names(&self) -> Vec<String> {
        self.locals.keys().cloned().collect()
    }

    fn get_local(&self, name: &str) -> Option<ModelValue> {
        self.locals.get(name).cloned()
    }

    fn set_local(&mut self, name: &str, value: ModelValue) {
        self.locals.insert(name.to_owned(), value);
    }

    fn remove_local(&mut self, name: &str) -> Option<ModelValue> {
        self.locals.shift_remove(name)
    }
}

#[cfg(test)]
mod tests;
