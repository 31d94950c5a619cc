// crates/ledger-harness-core/src/core/error.rs
// ============================================================================
// Module: Ledger Harness Errors
// Description: Error taxonomy for node interaction and case assertions.
// Purpose: Give every failure a stable kind so setup and case phases can react.
// Dependencies: thiserror, ethers-core
// ============================================================================

//! ## Overview
//! [`LedgerError`] covers the full failure surface of a harness run.
//! Connection and deployment failures during setup abort the run; every other
//! kind is local to the case that raised it. Nothing is retried.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while talking to a ledger node or asserting on its state.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - [`LedgerError::kind`] labels never change once published.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Node transport unreachable or the request could not complete.
    #[error("connection error: {0}")]
    Connection(String),
    /// Contract creation rejected by the node.
    #[error("deployment error: {0}")]
    Deployment(String),
    /// Invoked method reverted or trapped.
    #[error("execution error: {0}")]
    Execution(String),
    /// Gas limit exceeded before the transaction completed.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),
    /// Expected and observed values differ.
    #[error("assertion failed: {0}")]
    Assertion(String),
    /// ABI lookup, encoding, or decoding failed.
    #[error("abi error: {0}")]
    Abi(String),
    /// Contract artifact could not be loaded.
    #[error("artifact error: {0}")]
    Artifact(String),
    /// Node answered with a malformed payload.
    #[error("protocol error: {0}")]
    Protocol(String),
    /// Harness configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),
    /// A case did not resolve within its time budget.
    #[error("timed out: {0}")]
    Timeout(String),
}

impl LedgerError {
    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Connection(_) => "connection",
            Self::Deployment(_) => "deployment",
            Self::Execution(_) => "execution",
            Self::ResourceExhausted(_) => "resource_exhausted",
            Self::Assertion(_) => "assertion",
            Self::Abi(_) => "abi",
            Self::Artifact(_) => "artifact",
            Self::Protocol(_) => "protocol",
            Self::Config(_) => "config",
            Self::Timeout(_) => "timeout",
        }
    }
}

impl From<ethers_core::abi::Error> for LedgerError {
    fn from(err: ethers_core::abi::Error) -> Self {
        Self::Abi(err.to_string())
    }
}
