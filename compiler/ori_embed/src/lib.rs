//! Ori Embed - Host/guest binding synchronization.
//!
//! Keeps named bindings (constants, instance and class variables, globals,
//! top-level locals) in step between a host program and the guest
//! interpreter it embeds.
//!
//! # Architecture
//!
//! - `BindingKind`: closed set of kinds, each with its own name grammar
//! - `BindingRecord` / `BindingHandle`: one synchronized value, shared with
//!   the host so in-place updates stay visible
//! - `BindingMap`: ordered registry keyed by `(scope anchor, name)`
//! - `sync`: the inject / resync passes run around each script unit
//! - `BindingSession`: the evaluation loop hosts drive
//! - `GuestRuntime`: everything the engine needs from the interpreter
//!
//! `ModelRuntime` is an in-memory guest for tests and demos.
//!
//! # Debugging
//!
//! Set `RUST_LOG=ori_embed=debug` and call [`init_tracing`] to see injection
//! and resync decisions.

mod config;
pub mod errors;
mod generation;
mod guest;
mod kind;
pub mod model;
mod record;
mod registry;
mod scope;
mod scope_id;
pub mod session;
pub mod sync;

pub use config::{EmbedConfig, LocalBehavior, LAZY_VAR, LOCAL_BEHAVIOR_VAR};
pub use errors::{BindingError, BindingResult};
pub use generation::{BindingGeneration, SharedGeneration};
pub use guest::GuestRuntime;
pub use kind::{BindingKind, ARGV};
pub use model::{ModelRuntime, ModelValue};
pub use record::{BindingHandle, BindingRecord, Provenance};
pub use registry::BindingMap;
pub use scope::{resolve_lookup_scopes, resolve_receiver, resolve_store_scope, LookupScopes};
pub use scope_id::ScopeId;
pub use session::BindingSession;
pub use sync::{SyncContext, SyncPhase};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing from `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
