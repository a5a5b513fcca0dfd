//! Embedding configuration.
//!
//! Two knobs, both fixed when the registry is built:
//! - laziness: eager resync after every unit vs. on-demand per name
//! - local behavior: what happens to top-level locals between units
//!
//! # Environment Variables
//!
//! - `ORI_EMBED_LAZY`: `true`/`1` or `false`/`0`.
//! - `ORI_EMBED_LOCAL_BEHAVIOR`: `transient`, `persistent` or `global`.

use crate::errors::{BindingError, BindingResult};
use crate::kind::BindingKind;

/// Environment variable selecting lazy resync.
pub const LAZY_VAR: &str = "ORI_EMBED_LAZY";

/// Environment variable selecting the local-variable behavior.
pub const LOCAL_BEHAVIOR_VAR: &str = "ORI_EMBED_LOCAL_BEHAVIOR";

/// How top-level local variables are shared with the host.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LocalBehavior {
    /// Host locals are injected into each unit but never read back.
    #[default]
    Transient,
    /// Host locals are injected and guest locals are retrieved after each unit.
    Persistent,
    /// Local-style host names are backed by guest globals (`x` ↔ `$x`).
    Global,
}

impl LocalBehavior {
    /// The kind a bare lowercase host name maps to.
    #[inline]
    pub fn local_kind(self) -> BindingKind {
        match self {
            LocalBehavior::Transient | LocalBehavior::Persistent => BindingKind::Local,
            LocalBehavior::Global => BindingKind::LocalGlobal,
        }
    }

    /// Kinds pulled back from the guest after a unit, in pass order.
    ///
    /// `Global` behavior only tracks local-style globals; the other
    /// behaviors track every sigil kind, and `Persistent` adds locals first.
    pub fn retrieval_order(self) -> &'static [BindingKind] {
        match self {
            LocalBehavior::Transient => &[
                BindingKind::Instance,
                BindingKind::Global,
                BindingKind::Class,
                BindingKind::Constant,
            ],
            LocalBehavior::Persistent => &[
                BindingKind::Local,
                BindingKind::Instance,
                BindingKind::Global,
                BindingKind::Class,
                BindingKind::Constant,
            ],
            LocalBehavior::Global => &[BindingKind::LocalGlobal],
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "transient" => Some(LocalBehavior::Transient),
            "persistent" => Some(LocalBehavior::Persistent),
            "global" => Some(LocalBehavior::Global),
            _ => None,
        }
    }
}

/// Registry-wide configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbedConfig {
    /// Skip eager resync; pull single names on demand instead.
    pub lazy: bool,
    /// Sharing policy for top-level locals.
    pub local_behavior: LocalBehavior,
}

impl EmbedConfig {
    /// Lazy, transient locals.
    pub fn new() -> Self {
        EmbedConfig {
            lazy: true,
            local_behavior: LocalBehavior::Transient,
        }
    }

    /// Set laziness.
    #[must_use]
    pub fn lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    /// Set the local-variable behavior.
    #[must_use]
    pub fn local_behavior(mut self, behavior: LocalBehavior) -> Self {
        self.local_behavior = behavior;
        self
    }

    /// Read overrides from `ORI_EMBED_*` environment variables.
    pub fn from_env() -> BindingResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through an arbitrary key lookup.
    ///
    /// Unset keys keep their defaults; set but unparsable keys are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> BindingResult<Self> {
        let mut config = Self::new();

        if let Some(raw) = lookup(LAZY_VAR) {
            config.lazy = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => return Err(BindingError::config(LAZY_VAR, raw)),
            };
        }

        if let Some(raw) = lookup(LOCAL_BEHAVIOR_VAR) {
            config.local_behavior = LocalBehavior::parse(&raw)
                .ok_or_else(|| BindingError::config(LOCAL_BEHAVIOR_VAR, raw.clone()))?;
        }

        tracing::debug!(?config, "embed configuration");
        Ok(config)
    }
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
