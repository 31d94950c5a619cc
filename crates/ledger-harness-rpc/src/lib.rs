// crates/ledger-harness-rpc/src/lib.rs
// ============================================================================
// Module: Ledger Harness RPC Library
// Description: HTTP JSON-RPC implementation of the ledger connection.
// Purpose: Reach a development ledger node from the harness runtime.
// Dependencies: reqwest, serde_json, tokio, ledger-harness-core
// ============================================================================

//! ## Overview
//! This crate provides [`HttpLedgerConnection`], the production
//! [`ledger_harness_core::LedgerConnection`] for nodes that expose the
//! Ethereum JSON-RPC surface over HTTP with node-managed accounts.
//! Invariants:
//! - No request is retried; the first failure is classified and returned.
//! - Node failures map onto [`ledger_harness_core::LedgerError`] kinds.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod classify;
pub mod client;
pub mod connection;
pub mod wire;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use classify::NodeFailure;
pub use classify::classify_node_message;
pub use client::JsonRpcClient;
pub use client::MAX_TRANSCRIPT_ENTRIES;
pub use client::RpcError;
pub use client::TranscriptEntry;
pub use connection::HttpLedgerConnection;
pub use connection::ReceiptPolling;
