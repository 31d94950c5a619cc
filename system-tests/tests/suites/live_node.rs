// system-tests/tests/suites/live_node.rs
// ============================================================================
// Module: Live Node Tests
// Description: Reference enrollment scenario against an external node.
// Purpose: Run the harness unchanged against a real development ledger.
// Dependencies: system-tests helpers, ledger-harness-core, ledger-harness-rpc
// ============================================================================

//! ## Overview
//! Reference enrollment scenario against an external node.
//! Requires `LEDGER_HARNESS_SYSTEM_TEST_ARTIFACT` to name a compiled artifact
//! (a JSON document with `abi` and `bytecode`). The node endpoint comes from
//! `LEDGER_HARNESS_SYSTEM_TEST_RPC_URL` and defaults to `http://127.0.0.1:7545`.
//! Invariants:
//! - The node must control at least two accounts.
//! - A missing artifact fails the test rather than skipping it.

use std::fmt::Display;
use std::time::Duration;

use helpers::artifacts::TestReporter;
use helpers::cases::reference_cases;
use helpers::timeouts::resolve_timeout;
use ledger_harness_core::FileArtifactSource;
use ledger_harness_core::LedgerConnection;
use ledger_harness_core::TestHarness;
use ledger_harness_core::build_audit_sink;
use ledger_harness_core::wait_for_node_ready;
use ledger_harness_rpc::HttpLedgerConnection;
use system_tests::config::SystemTestConfig;
use system_tests::config::SystemTestEnv;

use crate::helpers;

#[tokio::test(flavor = "multi_thread")]
async fn live_node_reference_scenario() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("live_node_reference_scenario")?;
    let env = SystemTestConfig::load()?;
    let artifact_path = env.artifact_path.clone().ok_or_else(|| {
        format!("{} must name a compiled contract artifact", SystemTestEnv::ArtifactPath.as_str())
    })?;
    let config = env.harness_config()?;

    let connection = std::sync::Arc::new(HttpLedgerConnection::from_config(&config)?);
    let block = wait_for_node_ready(connection.as_ref(), resolve_timeout(Duration::from_secs(10)))
        .await?;
    let accounts = connection.list_accounts().await?;
    require(accounts.len() >= 2, format!("node controls {} accounts, need 2", accounts.len()))?;

    let shared: std::sync::Arc<dyn LedgerConnection> = connection.clone();
    let mut harness = TestHarness::new(shared, config.harness_settings()?)
        .with_audit_sink(build_audit_sink(&config.audit_log)?);
    let (enrolled, unenrolled) = reference_cases();
    let source = FileArtifactSource::combined(artifact_path);
    let report = harness.run_suite(&source, &[&enrolled, &unenrolled]).await;
    reporter.write_run_report(&report)?;
    reporter.artifacts().write_json("rpc_transcript.json", &connection.transcript())?;

    if let Some(error) = &report.setup_error {
        return Err(format!("setup failed: {error}").into());
    }
    if let Some(failed) = report.failures().next() {
        return Err(format!(
            "{} {}: {}",
            failed.name,
            failed.outcome.as_str(),
            failed.error.clone().unwrap_or_default()
        )
        .into());
    }
    require_eq(&report.cases.len(), &2, "case count")?;

    reporter.finish(
        "pass",
        vec![format!("node {} ready at block {block}", connection.rpc_url())],
        vec![
            "summary.json".to_string(),
            "summary.md".to_string(),
            "run_report.json".to_string(),
            "rpc_transcript.json".to_string(),
        ],
    )?;
    drop(reporter);
    Ok(())
}

fn require(condition: bool, message: impl Into<String>) -> Result<(), Box<dyn std::error::Error>> {
    if condition { Ok(()) } else { Err(message.into().into()) }
}

fn require_eq<T: PartialEq + Display>(
    left: &T,
    right: &T,
    context: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if left == right {
        Ok(())
    } else {
        Err(format!("{context}: left={left} right={right}").into())
    }
}
