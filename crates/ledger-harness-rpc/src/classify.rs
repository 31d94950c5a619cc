// crates/ledger-harness-rpc/src/classify.rs
// ============================================================================
// Module: Failure Classification
// Description: Maps JSON-RPC failures and failed receipts onto ledger errors.
// Purpose: Keep the error taxonomy in one place for deploy, send, and call.
// Dependencies: ledger-harness-core
// ============================================================================

//! ## Overview
//! Nodes report gas exhaustion and reverts as free-form messages. Messages are
//! matched case-insensitively against known fragments; anything unrecognized
//! is a plain rejection. Transport failures are always
//! [`LedgerError::Connection`].

use ledger_harness_core::GasLimit;
use ledger_harness_core::LedgerError;
use ledger_harness_core::TransactionReceipt;

use crate::client::RpcError;

// ============================================================================
// SECTION: Message Classification
// ============================================================================

/// Message fragments that indicate gas exhaustion.
const OUT_OF_GAS_MARKERS: &[&str] = &[
    "out of gas",
    "gas required exceeds",
    "intrinsic gas too low",
    "exceeds block gas limit",
    "base fee exceeds gas limit",
];

/// Message fragments that indicate a reverted or trapped execution.
const REVERT_MARKERS: &[&str] =
    &["revert", "vm exception", "invalid opcode", "invalid jump", "stack underflow"];

/// Category of a node-reported failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeFailure {
    /// Execution ran out of gas or the limit was too low to start.
    OutOfGas,
    /// Execution reverted or trapped.
    Revert,
    /// Anything else, such as an unknown sender.
    Rejected,
}

/// Classifies a node error message.
#[must_use]
pub fn classify_node_message(message: &str) -> NodeFailure {
    let lowered = message.to_ascii_lowercase();
    if OUT_OF_GAS_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        NodeFailure::OutOfGas
    } else if REVERT_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        NodeFailure::Revert
    } else {
        NodeFailure::Rejected
    }
}

// ============================================================================
// SECTION: Operation Mapping
// ============================================================================

/// Maps a failure of any read-only request (`eth_accounts`, `eth_blockNumber`).
pub fn query_error(err: RpcError) -> LedgerError {
    match err {
        RpcError::Transport(message) => LedgerError::Connection(message),
        RpcError::Node {
            code,
            message,
            ..
        } => LedgerError::Connection(format!("node error {code}: {message}")),
        RpcError::Protocol(message) => LedgerError::Protocol(message),
    }
}

/// Maps a failure while creating a contract.
pub fn deploy_error(err: RpcError) -> LedgerError {
    match err {
        RpcError::Transport(message) => LedgerError::Connection(message),
        RpcError::Node {
            message,
            ..
        } => match classify_node_message(&message) {
            NodeFailure::OutOfGas => {
                LedgerError::Deployment(format!("creation ran out of gas: {message}"))
            }
            NodeFailure::Revert => {
                LedgerError::Deployment(format!("creation reverted: {message}"))
            }
            NodeFailure::Rejected => {
                LedgerError::Deployment(format!("node rejected creation: {message}"))
            }
        },
        RpcError::Protocol(message) => LedgerError::Protocol(message),
    }
}

/// Maps a failure while sending a state-changing transaction.
pub fn send_error(method: &str, err: RpcError) -> LedgerError {
    match err {
        RpcError::Transport(message) => LedgerError::Connection(message),
        RpcError::Node {
            message,
            ..
        } => match classify_node_message(&message) {
            NodeFailure::OutOfGas => {
                LedgerError::ResourceExhausted(format!("{method} ran out of gas: {message}"))
            }
            NodeFailure::Revert => LedgerError::Execution(format!("{method} reverted: {message}")),
            NodeFailure::Rejected => {
                LedgerError::Execution(format!("node rejected {method}: {message}"))
            }
        },
        RpcError::Protocol(message) => LedgerError::Protocol(message),
    }
}

/// Maps a failure of a read-only call.
pub fn call_error(method: &str, err: RpcError) -> LedgerError {
    match err {
        RpcError::Transport(message) => LedgerError::Connection(message),
        RpcError::Node {
            message,
            ..
        } => LedgerError::Execution(format!("{method} call failed: {message}")),
        RpcError::Protocol(message) => LedgerError::Protocol(message),
    }
}

/// Maps a mined creation receipt that reports failure.
pub fn failed_creation(receipt: &TransactionReceipt, gas: GasLimit) -> LedgerError {
    if receipt.gas_used >= gas.get() {
        LedgerError::Deployment(format!(
            "creation {} ran out of gas ({} of {gas})",
            receipt.transaction_hash, receipt.gas_used
        ))
    } else {
        LedgerError::Deployment(format!("creation {} reverted", receipt.transaction_hash))
    }
}

/// Maps a mined invocation receipt that reports failure.
pub fn failed_invocation(method: &str, receipt: &TransactionReceipt, gas: GasLimit) -> LedgerError {
    if receipt.gas_used >= gas.get() {
        LedgerError::ResourceExhausted(format!(
            "{method} used all {gas} gas in {}",
            receipt.transaction_hash
        ))
    } else {
        LedgerError::Execution(format!("{method} reverted in {}", receipt.transaction_hash))
    }
}
