//! Binding kinds and their name grammars.
//!
//! Each kind owns a pure name predicate. The predicate gates record
//! construction (invalid names never become records) and host requests
//! (a malformed name is reported, not dropped).

use std::fmt;

use crate::config::LocalBehavior;

/// Name of the argument-vector constant. It has one record per registry,
/// anchored at the top-level scope.
pub const ARGV: &str = "ARGV";

/// The closed set of binding kinds.
///
/// Enum (not trait objects): the evaluation loop iterates a fixed order and
/// every kind is known up front.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BindingKind {
    /// Top-level local variable (`count`).
    Local,
    /// Local-style host name backed by a guest global (`count` ↔ `$count`).
    LocalGlobal,
    /// Instance variable of the receiver (`@count`).
    Instance,
    /// Class variable of the receiver's scope (`@@count`).
    Class,
    /// Process-wide global (`$count`).
    Global,
    /// Constant (`MAX`).
    Constant,
}

impl BindingKind {
    /// Every kind, in declaration order.
    pub const ALL: [BindingKind; 6] = [
        BindingKind::Local,
        BindingKind::LocalGlobal,
        BindingKind::Instance,
        BindingKind::Class,
        BindingKind::Global,
        BindingKind::Constant,
    ];

    /// Returns `true` if `name` is a legal binding name for this kind.
    ///
    /// Full-string match, ASCII only:
    /// - `Constant`: `[A-Z][A-Za-z_][A-Za-z_0-9]*`
    /// - `Global`: `\$[A-Za-z_][A-Za-z_0-9]*`
    /// - `Instance`: `@[A-Za-z_][A-Za-z_0-9]*`
    /// - `Class`: `@@[A-Za-z_][A-Za-z_0-9]*`
    /// - `Local`, `LocalGlobal`: `[a-z_][A-Za-z_0-9]*`
    pub fn is_valid_name(self, name: &str) -> bool {
        match self {
            BindingKind::Constant => is_constant_name(name),
            BindingKind::Global => name.strip_prefix('$').is_some_and(is_identifier),
            BindingKind::Instance => name.strip_prefix('@').is_some_and(is_identifier),
            BindingKind::Class => name.strip_prefix("@@").is_some_and(is_identifier),
            BindingKind::Local | BindingKind::LocalGlobal => is_local_name(name),
        }
    }

    /// Pick the kind a host-supplied name belongs to.
    ///
    /// Sigils are checked most specific first (`@@` before `@`). A bare
    /// lowercase name is a `Local` unless the behavior maps locals onto
    /// guest globals.
    pub fn classify(name: &str, behavior: LocalBehavior) -> Option<BindingKind> {
        [
            BindingKind::Class,
            BindingKind::Instance,
            BindingKind::Global,
            BindingKind::Constant,
            behavior.local_kind(),
        ]
        .into_iter()
        .find(|kind| kind.is_valid_name(name))
    }

    /// The name this binding carries inside the guest.
    ///
    /// Only `LocalGlobal` differs from the host name.
    pub fn guest_name(self, name: &str) -> String {
        match self {
            BindingKind::LocalGlobal => format!("${name}"),
            _ => name.to_owned(),
        }
    }

    /// Inverse of [`guest_name`](Self::guest_name) for `LocalGlobal`.
    ///
    /// Returns `None` when the guest name is not a global that maps back to
    /// a valid local-style host name.
    pub fn host_name_of_global(guest_name: &str) -> Option<&str> {
        guest_name
            .strip_prefix('$')
            .filter(|stripped| is_local_name(stripped))
    }

    /// Whether injecting this kind invalidates guest constant caches.
    #[inline]
    pub fn bumps_generation(self) -> bool {
        matches!(self, BindingKind::Constant)
    }

    /// Whether pending values are pushed again before every unit.
    ///
    /// Locals live in the unit's own frame, so a materialized local must be
    /// re-injected for the next unit to see it.
    #[inline]
    pub fn reinjects_every_unit(self) -> bool {
        matches!(self, BindingKind::Local)
    }

    /// Short lowercase label used in diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            BindingKind::Local => "local variable",
            BindingKind::LocalGlobal => "local global",
            BindingKind::Instance => "instance variable",
            BindingKind::Class => "class variable",
            BindingKind::Global => "global variable",
            BindingKind::Constant => "constant",
        }
    }
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[inline]
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

#[inline]
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// `[A-Za-z_][A-Za-z_0-9]*`
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(is_ident_start) && chars.all(is_ident_continue)
}

/// `[A-Z][A-Za-z_][A-Za-z_0-9]*` (two characters minimum).
fn is_constant_name(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.next().is_some_and(is_ident_start)
        && chars.all(is_ident_continue)
}

/// `[a-z_][A-Za-z_0-9]*`
fn is_local_name(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
        && chars.all(is_ident_continue)
}

#[cfg(test)]
mod tests;
