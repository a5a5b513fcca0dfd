//! Errors surfaced to host callers.
//!
//! Only host mistakes are errors. Guest-side misses (a scope that is not
//! defined yet, a name that does not exist yet) are the steady state during
//! incremental evaluation and are absorbed by the engine.

use thiserror::Error;

use crate::kind::BindingKind;

/// Result alias for host-facing operations.
pub type BindingResult<T> = Result<T, BindingError>;

/// Host-facing binding error.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BindingError {
    /// The name fails the grammar of the requested kind, or of every kind
    /// when `kind` is `None`.
    #[error("{}", invalid_name_message(.kind, .name))]
    InvalidName {
        kind: Option<BindingKind>,
        name: String,
    },

    /// A configuration key holds a value that cannot be parsed.
    #[error("invalid value `{value}` for {key}")]
    Config { key: &'static str, value: String },
}

impl BindingError {
    /// Name rejected by a specific kind's validator.
    pub fn invalid_name(kind: BindingKind, name: impl Into<String>) -> Self {
        BindingError::InvalidName {
            kind: Some(kind),
            name: name.into(),
        }
    }

    /// Name rejected by every kind's validator.
    pub fn unclassified_name(name: impl Into<String>) -> Self {
        BindingError::InvalidName {
            kind: None,
            name: name.into(),
        }
    }

    /// Unparsable configuration value.
    pub fn config(key: &'static str, value: impl Into<String>) -> Self {
        BindingError::Config {
            key,
            value: value.into(),
        }
    }
}

fn invalid_name_message(kind: &Option<BindingKind>, name: &str) -> String {
    match kind {
        Some(kind) => format!("`{name}` is not a valid {kind} name"),
        None => format!("`{name}` is not a valid binding name"),
    }
}
