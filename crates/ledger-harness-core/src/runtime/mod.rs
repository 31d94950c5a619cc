// crates/ledger-harness-core/src/runtime/mod.rs
// ============================================================================
// Module: Ledger Harness Runtime
// Description: Contract handles, deployment, and the case runner.
// Purpose: Drive a deployed contract through independent assertion cases.
// Dependencies: crate::interfaces, tokio
// ============================================================================

//! ## Overview
//! The runtime turns a [`crate::LedgerConnection`] into a usable test run:
//! [`DeploymentOrchestrator`] deploys once, [`ContractHandle`] and
//! [`StudentsContract`] wrap the instance, and [`TestHarness`] executes cases
//! sequentially under a per-case timeout.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod assertions;
pub mod contract;
pub mod deploy;
pub mod harness;
pub mod readiness;
pub mod students;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use assertions::ensure;
pub use assertions::ensure_eq;
pub use contract::ContractHandle;
pub use deploy::DeploymentOrchestrator;
pub use harness::CaseOutcome;
pub use harness::CaseReport;
pub use harness::DeployedFixture;
pub use harness::HarnessCase;
pub use harness::HarnessPhase;
pub use harness::HarnessSettings;
pub use harness::RunReport;
pub use harness::TestHarness;
pub use readiness::wait_for_node_ready;
pub use students::StudentsContract;
