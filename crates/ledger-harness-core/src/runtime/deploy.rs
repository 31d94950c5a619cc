// crates/ledger-harness-core/src/runtime/deploy.rs
// ============================================================================
// Module: Deployment Orchestrator
// Description: One-shot contract deployment shared by every case in a run.
// Purpose: Guarantee a single contract instance per run.
// Dependencies: tokio, crate::interfaces, crate::artifact
// ============================================================================

//! ## Overview
//! [`DeploymentOrchestrator::deploy_once`] loads the artifact and submits the
//! creation transaction the first time it is called. Later calls return the
//! same [`ContractHandle`]; after a failed attempt they return the original
//! failure without contacting the node again.
//! Invariants:
//! - At most one creation transaction per orchestrator.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Instant;

use ethers_core::abi::Token;
use tokio::sync::Mutex;

use crate::artifact::ArtifactSource;
use crate::audit::HarnessAuditEvent;
use crate::audit::HarnessAuditSink;
use crate::audit::NoopAuditSink;
use crate::core::Account;
use crate::core::GasLimit;
use crate::core::LedgerError;
use crate::interfaces::LedgerConnection;
use crate::runtime::ContractHandle;

// ============================================================================
// SECTION: State
// ============================================================================

/// Deployment progress for one orchestrator.
enum DeployState {
    /// No attempt made yet.
    Pending,
    /// Deployment confirmed.
    Deployed(ContractHandle),
    /// Deployment failed; the error is replayed to later callers.
    Failed(LedgerError),
}

// ============================================================================
// SECTION: Orchestrator
// ============================================================================

/// Deploys a contract exactly once and hands out the resulting handle.
pub struct DeploymentOrchestrator {
    /// Connection used for the deployment and bound into the handle.
    connection: Arc<dyn LedgerConnection>,
    /// Audit sink for deployment events.
    audit: Arc<dyn HarnessAuditSink>,
    /// Constructor arguments appended to the bytecode.
    constructor_args: Vec<Token>,
    /// Deployment progress.
    state: Mutex<DeployState>,
}

impl DeploymentOrchestrator {
    /// Creates an orchestrator for a connection.
    #[must_use]
    pub fn new(connection: Arc<dyn LedgerConnection>) -> Self {
        Self {
            connection,
            audit: Arc::new(NoopAuditSink),
            constructor_args: Vec::new(),
            state: Mutex::new(DeployState::Pending),
        }
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn HarnessAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Sets the constructor arguments encoded after the bytecode.
    #[must_use]
    pub fn with_constructor_args(mut self, args: Vec<Token>) -> Self {
        self.constructor_args = args;
        self
    }

    /// Deploys the artifact on first use and returns the shared handle.
    ///
    /// # Errors
    ///
    /// Returns the artifact, ABI, deployment, or connection error of the one
    /// attempt this orchestrator makes.
    pub async fn deploy_once(
        &self,
        source: &dyn ArtifactSource,
        deployer: Account,
        gas: GasLimit,
    ) -> Result<ContractHandle, LedgerError> {
        let mut state = self.state.lock().await;
        match &*state {
            DeployState::Deployed(handle) => return Ok(handle.clone()),
            DeployState::Failed(err) => return Err(err.clone()),
            DeployState::Pending => {}
        }
        let started = Instant::now();
        let result = self.deploy(source, deployer, gas).await;
        let elapsed = started.elapsed().as_millis();
        match result {
            Ok(handle) => {
                self.audit.record(
                    &HarnessAuditEvent::new("deployment")
                        .with_contract(handle.address().to_string())
                        .with_outcome("ok")
                        .with_message(source.describe())
                        .with_duration_ms(elapsed),
                );
                *state = DeployState::Deployed(handle.clone());
                Ok(handle)
            }
            Err(err) => {
                self.audit.record(
                    &HarnessAuditEvent::new("deployment")
                        .with_outcome("error")
                        .with_error(&err)
                        .with_duration_ms(elapsed),
                );
                *state = DeployState::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Returns the handle when a deployment has been confirmed.
    pub async fn deployed(&self) -> Option<ContractHandle> {
        match &*self.state.lock().await {
            DeployState::Deployed(handle) => Some(handle.clone()),
            DeployState::Pending | DeployState::Failed(_) => None,
        }
    }

    /// Loads the artifact and submits the creation transaction.
    async fn deploy(
        &self,
        source: &dyn ArtifactSource,
        deployer: Account,
        gas: GasLimit,
    ) -> Result<ContractHandle, LedgerError> {
        let artifact = source.load()?;
        let payload = artifact.abi.encode_deployment(&artifact.bytecode, &self.constructor_args)?;
        let deployed = self.connection.deploy(&payload, &artifact.abi, deployer, gas).await?;
        Ok(ContractHandle::new(deployed, Arc::clone(&self.connection)))
    }
}
