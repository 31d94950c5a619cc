// crates/ledger-harness-core/src/runtime/harness.rs
// ============================================================================
// Module: Test Harness
// Description: One setup phase followed by independent assertion cases.
// Purpose: Run cases against a single shared deployment with explicit timeouts.
// Dependencies: async-trait, futures, tokio, serde, crate::runtime
// ============================================================================

//! ## Overview
//! [`TestHarness`] moves through `Uninitialized -> Deployed -> Finished`.
//! Setup lists the node's accounts and deploys the contract once; the
//! resulting [`DeployedFixture`] is shared read-only with every case.
//! Invariants:
//! - A setup failure aborts the run; no case executes.
//! - A case failure, panic, or timeout is recorded and the next case still runs.
//! - Cases run sequentially; the harness never has two cases in flight.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use async_trait::async_trait;
use ethers_core::abi::Token;
use futures::FutureExt;
use serde::Serialize;
use tokio::time::timeout;

use crate::artifact::ArtifactSource;
use crate::audit::HarnessAuditEvent;
use crate::audit::HarnessAuditSink;
use crate::audit::NoopAuditSink;
use crate::config::DEFAULT_CASE_TIMEOUT_MS;
use crate::core::Account;
use crate::core::ContractAddress;
use crate::core::GasLimit;
use crate::core::LedgerError;
use crate::interfaces::LedgerConnection;
use crate::runtime::ContractHandle;
use crate::runtime::DeploymentOrchestrator;
use crate::runtime::StudentsContract;

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Runtime knobs for a harness run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarnessSettings {
    /// Gas budget for deployment and state-changing calls.
    pub gas_limit: GasLimit,
    /// Upper bound on the duration of a single case.
    pub case_timeout: Duration,
    /// Index into the node's account list used as deployer.
    pub deployer_index: usize,
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            gas_limit: GasLimit::default(),
            case_timeout: Duration::from_millis(DEFAULT_CASE_TIMEOUT_MS),
            deployer_index: 0,
        }
    }
}

// ============================================================================
// SECTION: Fixture
// ============================================================================

/// Immutable state produced by setup and injected into every case.
#[derive(Debug)]
pub struct DeployedFixture {
    /// Handle to the single deployed contract.
    contract: ContractHandle,
    /// Accounts controlled by the node, in node order.
    accounts: Vec<Account>,
    /// Gas budget for state-changing calls.
    gas_limit: GasLimit,
}

impl DeployedFixture {
    /// Returns the deployed contract.
    #[must_use]
    pub const fn contract(&self) -> &ContractHandle {
        &self.contract
    }

    /// Returns the node's accounts.
    #[must_use]
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Returns the account at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Config`] when the node controls fewer accounts.
    pub fn account(&self, index: usize) -> Result<Account, LedgerError> {
        self.accounts.get(index).copied().ok_or_else(|| {
            LedgerError::Config(format!(
                "account {index} requested but the node controls {}",
                self.accounts.len()
            ))
        })
    }

    /// Returns the gas budget for state-changing calls.
    #[must_use]
    pub const fn gas_limit(&self) -> GasLimit {
        self.gas_limit
    }

    /// Returns the typed enrollment contract.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Abi`] when the deployed ABI is not the students ABI.
    pub fn students(&self) -> Result<StudentsContract, LedgerError> {
        StudentsContract::new(self.contract.clone())
    }
}

// ============================================================================
// SECTION: Cases
// ============================================================================

/// One independent assertion case.
#[async_trait]
pub trait HarnessCase: Send + Sync {
    /// Returns the case name used in reports.
    fn name(&self) -> &str;

    /// Runs the case against the shared fixture.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Assertion`] for mismatches, or the node error that
    /// interrupted the case.
    async fn run(&self, fixture: &DeployedFixture) -> Result<(), LedgerError>;
}

/// Resolution of a single case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseOutcome {
    /// All assertions held.
    Passed,
    /// An assertion or node call failed.
    Failed,
    /// The case exceeded its time budget.
    TimedOut,
}

impl CaseOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "pass",
            Self::Failed => "fail",
            Self::TimedOut => "timed_out",
        }
    }
}

/// Report for one case.
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    /// Case name.
    pub name: String,
    /// Outcome.
    pub outcome: CaseOutcome,
    /// Error kind label when the case did not pass.
    pub error_kind: Option<&'static str>,
    /// Error message when the case did not pass.
    pub error: Option<String>,
    /// Wall-clock duration of the case.
    pub duration_ms: u128,
}

impl CaseReport {
    /// Builds a report from a case result.
    fn from_result(name: String, result: &Result<(), LedgerError>, duration_ms: u128) -> Self {
        let (outcome, error_kind, error) = match result {
            Ok(()) => (CaseOutcome::Passed, None, None),
            Err(err @ LedgerError::Timeout(_)) => {
                (CaseOutcome::TimedOut, Some(err.kind()), Some(err.to_string()))
            }
            Err(err) => (CaseOutcome::Failed, Some(err.kind()), Some(err.to_string())),
        };
        Self {
            name,
            outcome,
            error_kind,
            error,
            duration_ms,
        }
    }

    /// Returns true when the case passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.outcome == CaseOutcome::Passed
    }
}

/// Report for a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Address of the contract under test when setup succeeded.
    pub contract: Option<ContractAddress>,
    /// Error kind label when setup failed.
    pub setup_error_kind: Option<&'static str>,
    /// Setup failure that aborted the run.
    pub setup_error: Option<String>,
    /// Case reports in execution order.
    pub cases: Vec<CaseReport>,
}

impl RunReport {
    /// Returns true when setup succeeded and every case passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.setup_error.is_none() && self.cases.iter().all(CaseReport::passed)
    }

    /// Returns the report for a named case.
    #[must_use]
    pub fn case(&self, name: &str) -> Option<&CaseReport> {
        self.cases.iter().find(|case| case.name == name)
    }

    /// Returns the cases that did not pass.
    pub fn failures(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases.iter().filter(|case| !case.passed())
    }
}

// ============================================================================
// SECTION: Harness
// ============================================================================

/// Lifecycle phase of a harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessPhase {
    /// Setup has not succeeded yet.
    Uninitialized,
    /// Contract deployed; cases may run.
    Deployed,
    /// Suite completed; no further cases run.
    Finished,
}

/// Orchestrates one setup phase and a sequence of cases.
pub struct TestHarness {
    /// Connection to the node under test.
    connection: Arc<dyn LedgerConnection>,
    /// Deploys the contract exactly once.
    orchestrator: DeploymentOrchestrator,
    /// Runtime settings.
    settings: HarnessSettings,
    /// Audit sink for lifecycle events.
    audit: Arc<dyn HarnessAuditSink>,
    /// Constructor arguments for the deployment.
    constructor_args: Vec<Token>,
    /// Fixture produced by a successful setup.
    fixture: Option<Arc<DeployedFixture>>,
    /// Set once the suite completed.
    finished: bool,
}

impl TestHarness {
    /// Creates a harness for a connection.
    #[must_use]
    pub fn new(connection: Arc<dyn LedgerConnection>, settings: HarnessSettings) -> Self {
        Self {
            orchestrator: DeploymentOrchestrator::new(Arc::clone(&connection)),
            connection,
            settings,
            audit: Arc::new(NoopAuditSink),
            constructor_args: Vec::new(),
            fixture: None,
            finished: false,
        }
    }

    /// Replaces the audit sink for the harness and its orchestrator.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn HarnessAuditSink>) -> Self {
        self.audit = audit;
        self.rebuild_orchestrator();
        self
    }

    /// Sets the constructor arguments used by the deployment.
    #[must_use]
    pub fn with_constructor_args(mut self, args: Vec<Token>) -> Self {
        self.constructor_args = args;
        self.rebuild_orchestrator();
        self
    }

    /// Returns the current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> HarnessPhase {
        if self.finished {
            HarnessPhase::Finished
        } else if self.fixture.is_some() {
            HarnessPhase::Deployed
        } else {
            HarnessPhase::Uninitialized
        }
    }

    /// Returns the fixture once setup succeeded.
    #[must_use]
    pub fn fixture(&self) -> Option<Arc<DeployedFixture>> {
        self.fixture.clone()
    }

    /// Returns the runtime settings.
    #[must_use]
    pub const fn settings(&self) -> &HarnessSettings {
        &self.settings
    }

    /// Lists accounts and deploys the contract; repeated calls reuse the fixture.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Connection`] or [`LedgerError::Deployment`] (or an
    /// artifact / ABI error) when setup fails, and [`LedgerError::Config`] when
    /// the run already finished.
    pub async fn setup(
        &mut self,
        source: &dyn ArtifactSource,
    ) -> Result<Arc<DeployedFixture>, LedgerError> {
        if self.finished {
            return Err(LedgerError::Config("harness run already finished".to_string()));
        }
        if let Some(fixture) = &self.fixture {
            return Ok(Arc::clone(fixture));
        }
        let started = Instant::now();
        match self.build_fixture(source).await {
            Ok(fixture) => {
                self.audit.record(
                    &HarnessAuditEvent::new("setup")
                        .with_contract(fixture.contract.address().to_string())
                        .with_outcome("ok")
                        .with_duration_ms(started.elapsed().as_millis()),
                );
                self.fixture = Some(Arc::clone(&fixture));
                Ok(fixture)
            }
            Err(err) => {
                self.audit.record(
                    &HarnessAuditEvent::new("setup")
                        .with_outcome("error")
                        .with_error(&err)
                        .with_duration_ms(started.elapsed().as_millis()),
                );
                Err(err)
            }
        }
    }

    /// Runs one case under the configured timeout.
    ///
    /// A panic inside the case is reported as an assertion failure.
    pub async fn run_case(&self, case: &dyn HarnessCase) -> CaseReport {
        let name = case.name().to_string();
        self.audit.record(&HarnessAuditEvent::new("case_started").with_case(name.clone()));
        let started = Instant::now();
        let result = match &self.fixture {
            _ if self.finished => {
                Err(LedgerError::Config(format!("case {name} ran after the suite finished")))
            }
            None => Err(LedgerError::Config(format!("case {name} ran before setup"))),
            Some(fixture) => {
                let guarded = AssertUnwindSafe(case.run(fixture)).catch_unwind();
                match timeout(self.settings.case_timeout, guarded).await {
                    Ok(Ok(result)) => result,
                    Ok(Err(payload)) => Err(LedgerError::Assertion(format!(
                        "case {name} panicked: {}",
                        panic_message(payload.as_ref())
                    ))),
                    Err(_) => Err(LedgerError::Timeout(format!(
                        "case {name} exceeded {} ms",
                        self.settings.case_timeout.as_millis()
                    ))),
                }
            }
        };
        let report = CaseReport::from_result(name, &result, started.elapsed().as_millis());
        let mut event = HarnessAuditEvent::new("case_finished")
            .with_case(report.name.clone())
            .with_outcome(report.outcome.as_str())
            .with_duration_ms(report.duration_ms);
        if let Err(err) = &result {
            event = event.with_error(err);
        }
        self.audit.record(&event);
        report
    }

    /// Runs setup and then every case in order, finishing the harness.
    pub async fn run_suite(
        &mut self,
        source: &dyn ArtifactSource,
        cases: &[&dyn HarnessCase],
    ) -> RunReport {
        let fixture = match self.setup(source).await {
            Ok(fixture) => fixture,
            Err(err) => {
                self.finished = true;
                self.audit.record(
                    &HarnessAuditEvent::new("run_finished").with_outcome("error").with_error(&err),
                );
                return RunReport {
                    contract: None,
                    setup_error_kind: Some(err.kind()),
                    setup_error: Some(err.to_string()),
                    cases: Vec::new(),
                };
            }
        };
        let mut reports = Vec::with_capacity(cases.len());
        for case in cases {
            reports.push(self.run_case(*case).await);
        }
        self.finished = true;
        let report = RunReport {
            contract: Some(fixture.contract.address()),
            setup_error_kind: None,
            setup_error: None,
            cases: reports,
        };
        let failed = report.failures().count();
        self.audit.record(
            &HarnessAuditEvent::new("run_finished")
                .with_contract(fixture.contract.address().to_string())
                .with_outcome(if failed == 0 { "ok" } else { "error" })
                .with_message(format!("{} cases, {failed} failed", report.cases.len())),
        );
        report
    }

    /// Replaces the orchestrator so it carries the current sink and arguments.
    fn rebuild_orchestrator(&mut self) {
        self.orchestrator = DeploymentOrchestrator::new(Arc::clone(&self.connection))
            .with_audit_sink(Arc::clone(&self.audit))
            .with_constructor_args(self.constructor_args.clone());
    }

    /// Lists accounts, selects the deployer, and deploys once.
    async fn build_fixture(
        &self,
        source: &dyn ArtifactSource,
    ) -> Result<Arc<DeployedFixture>, LedgerError> {
        let accounts = self.connection.list_accounts().await?;
        let deployer = accounts.get(self.settings.deployer_index).copied().ok_or_else(|| {
            LedgerError::Deployment(format!(
                "deployer index {} out of range; node controls {} accounts",
                self.settings.deployer_index,
                accounts.len()
            ))
        })?;
        let contract =
            self.orchestrator.deploy_once(source, deployer, self.settings.gas_limit).await?;
        Ok(Arc::new(DeployedFixture {
            contract,
            accounts,
            gas_limit: self.settings.gas_limit,
        }))
    }
}

/// Extracts the message carried by a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
