//! Guest scope handles.
//!
//! The engine never owns a guest scope (module, class, top-level object).
//! It holds a `ScopeId`, a compact copyable handle the guest runtime can
//! re-resolve on every pass.

use std::fmt;

/// Handle for a guest-side scope anchor.
///
/// Layout: opaque 32-bit index assigned by the guest runtime. Two handles are
/// the same scope iff their raw values are equal.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct ScopeId(u32);

impl ScopeId {
    /// Create from a raw runtime index.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        ScopeId(raw)
    }

    /// Get raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({})", self.0)
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
