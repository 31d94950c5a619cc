// crates/ledger-harness-core/src/runtime/assertions.rs
// ============================================================================
// Module: Case Assertions
// Description: Assertion helpers that fail a case instead of panicking.
// Purpose: Turn failed expectations into typed case errors.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Cases check results with [`ensure`] and [`ensure_eq`], which return
//! [`LedgerError::Assertion`] so the harness records the case as failed and
//! moves on to the next one.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Display;

use crate::core::LedgerError;

// ============================================================================
// SECTION: Assertions
// ============================================================================

/// Fails with [`LedgerError::Assertion`] when `condition` is false.
///
/// # Errors
///
/// Returns [`LedgerError::Assertion`] carrying `message`.
pub fn ensure(condition: bool, message: impl Into<String>) -> Result<(), LedgerError> {
    if condition { Ok(()) } else { Err(LedgerError::Assertion(message.into())) }
}

/// Fails with [`LedgerError::Assertion`] when `expected != actual`.
///
/// # Errors
///
/// Returns [`LedgerError::Assertion`] naming `context` and both values.
pub fn ensure_eq<T: PartialEq + Display + ?Sized>(
    expected: &T,
    actual: &T,
    context: &str,
) -> Result<(), LedgerError> {
    if expected == actual {
        Ok(())
    } else {
        Err(LedgerError::Assertion(format!("{context}: expected {expected}, got {actual}")))
    }
}
