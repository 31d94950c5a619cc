// crates/ledger-harness-core/src/core/limits.rs
// ============================================================================
// Module: Resource Limits
// Description: Gas limit attached to every state-changing transaction.
// Purpose: Keep a zero gas budget unrepresentable.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`GasLimit`] bounds the execution cost of one deployment or invocation.
//! Invariants:
//! - A limit is never zero.
//! - The default is [`DEFAULT_GAS_LIMIT`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::num::NonZeroU64;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Gas Limit
// ============================================================================

/// Gas budget used by the harness when no override is configured.
pub const DEFAULT_GAS_LIMIT: u64 = 1_000_000;

/// Upper bound on execution cost for one transaction.
///
/// # Invariants
/// - Always >= 1; a zero budget can never execute anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GasLimit(NonZeroU64);

impl GasLimit {
    /// Creates a gas limit from a non-zero value.
    #[must_use]
    pub const fn new(limit: NonZeroU64) -> Self {
        Self(limit)
    }

    /// Creates a gas limit from a raw value (returns `None` if zero).
    #[must_use]
    pub fn from_raw(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    /// Returns the raw limit (always >= 1).
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl Default for GasLimit {
    fn default() -> Self {
        Self(NonZeroU64::MIN.saturating_add(DEFAULT_GAS_LIMIT - 1))
    }
}

impl fmt::Display for GasLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.get().fmt(f)
    }
}
