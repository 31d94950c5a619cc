// crates/ledger-harness-core/src/lib.rs
// ============================================================================
// Module: Ledger Harness Core Library
// Description: Contract-interaction primitives for ledger test harnesses.
// Purpose: Deploy one contract per run and assert on its observable state.
// Dependencies: ethers-core, serde, thiserror, tokio, async-trait
// ============================================================================

//! ## Overview
//! Ledger Harness Core defines the transport-agnostic pieces of a contract
//! test client: typed identifiers and records, the [`LedgerConnection`]
//! interface, ABI encoding through [`ContractAbi`], artifact loading, and the
//! runtime that deploys a contract once ([`DeploymentOrchestrator`]) and runs
//! independent cases against it ([`TestHarness`]).
//! Invariants:
//! - Exactly one deployment per harness run.
//! - Missing records surface as sentinel defaults, never as errors.
//! - Numeric outputs are returned as decimal text and compared as text.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod abi;
pub mod artifact;
pub mod audit;
pub mod config;
pub mod core;
pub mod interfaces;
pub mod runtime;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use abi::ContractAbi;
pub use abi::Mutability;
pub use artifact::ArtifactSource;
pub use artifact::ContractArtifact;
pub use artifact::FileArtifactSource;
pub use artifact::InlineArtifactSource;
pub use audit::FileAuditSink;
pub use audit::HarnessAuditEvent;
pub use audit::HarnessAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use audit::build_audit_sink;
pub use config::AuditLogConfig;
pub use config::AuditLogMode;
pub use config::HarnessConfig;
pub use crate::core::Account;
pub use crate::core::ContractAddress;
pub use crate::core::DEFAULT_GAS_LIMIT;
pub use crate::core::DeployedContract;
pub use crate::core::GasLimit;
pub use crate::core::LedgerError;
pub use crate::core::ReceiptStatus;
pub use crate::core::ResultField;
pub use crate::core::ResultTuple;
pub use crate::core::StudentRecord;
pub use crate::core::StudentView;
pub use crate::core::TransactionReceipt;
pub use crate::core::TxHash;
pub use ethers_core::abi::Token;
pub use interfaces::LedgerConnection;
pub use runtime::CaseOutcome;
pub use runtime::CaseReport;
pub use runtime::ContractHandle;
pub use runtime::DeployedFixture;
pub use runtime::DeploymentOrchestrator;
pub use runtime::HarnessCase;
pub use runtime::HarnessPhase;
pub use runtime::HarnessSettings;
pub use runtime::RunReport;
pub use runtime::StudentsContract;
pub use runtime::TestHarness;
pub use runtime::ensure;
pub use runtime::ensure_eq;
pub use runtime::wait_for_node_ready;
