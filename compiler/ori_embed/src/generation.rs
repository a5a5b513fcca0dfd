//! Binding generation counter.
//!
//! The guest keeps name-lookup caches keyed on a process-wide generation.
//! Every namespace mutation the engine performs on a cached table must bump
//! it. The counter is passed into the engine as an explicit capability so
//! tests can count bumps.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Capability to read and advance the guest's binding generation.
///
/// Implementations must be monotonic: `bump` never lowers the value and
/// nothing resets it.
pub trait BindingGeneration {
    /// Advance the generation and return the new value.
    fn bump(&self) -> u64;

    /// Current generation.
    fn current(&self) -> u64;
}

/// Shareable atomic generation counter.
///
/// Clones observe the same counter, so the guest runtime and the engine can
/// each hold one.
#[derive(Clone, Default)]
pub struct SharedGeneration(Arc<AtomicU64>);

impl SharedGeneration {
    /// Start at generation zero.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BindingGeneration for SharedGeneration {
    #[inline]
    fn bump(&self) -> u64 {
        // Readers only compare against stale values; no ordering with other memory.
        self.0.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    #[inline]
    fn current(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for SharedGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedGeneration({})", self.current())
    }
}
