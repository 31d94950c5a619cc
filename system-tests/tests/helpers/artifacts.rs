// system-tests/tests/helpers/artifacts.rs
// ============================================================================
// Module: Test Artifacts
// Description: Per-test artifact roots and harness run summaries.
// Purpose: Leave a canonical record of every run for post-mortem review.
// Dependencies: system-tests, ledger-harness-core, serde, serde_jcs
// ============================================================================

//! ## Overview
//! Each test writes into its own directory under the configured run root.
//! JSON artifacts are JCS-canonical so two runs of the same scenario diff
//! cleanly. When a test records a [`RunReport`], the summary also lists the
//! contract under test and every case outcome.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use ledger_harness_core::RunReport;
use serde::Serialize;
use system_tests::config::SystemTestConfig;

#[derive(Debug, Serialize)]
struct TestSummary {
    test_name: String,
    status: String,
    started_at_ms: u128,
    ended_at_ms: u128,
    duration_ms: u128,
    harness_run: Option<HarnessRunSummary>,
    notes: Vec<String>,
    artifacts: Vec<String>,
}

/// Condensed view of the last harness run recorded by a test.
#[derive(Debug, Clone, Serialize)]
struct HarnessRunSummary {
    contract: Option<String>,
    setup_error: Option<String>,
    cases: Vec<CaseLine>,
}

#[derive(Debug, Clone, Serialize)]
struct CaseLine {
    name: String,
    outcome: &'static str,
    error_kind: Option<&'static str>,
}

impl HarnessRunSummary {
    fn from_report(report: &RunReport) -> Self {
        Self {
            contract: report.contract.map(|contract| contract.to_string()),
            setup_error: report.setup_error.clone(),
            cases: report
                .cases
                .iter()
                .map(|case| CaseLine {
                    name: case.name.clone(),
                    outcome: case.outcome.as_str(),
                    error_kind: case.error_kind,
                })
                .collect(),
        }
    }
}

fn now_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

/// Fallback root when `LEDGER_HARNESS_SYSTEM_TEST_RUN_ROOT` is unset.
fn default_run_root(test_name: &str) -> PathBuf {
    let stamp = now_millis();
    PathBuf::from("target/system-tests").join(format!("run_{stamp}")).join(test_name)
}

/// Output directory owned by one system test.
#[derive(Debug, Clone)]
pub struct TestArtifacts {
    root: PathBuf,
}

impl TestArtifacts {
    /// Creates `<run root>/<test_name>`.
    pub fn new(test_name: &str) -> io::Result<Self> {
        let config = SystemTestConfig::load().map_err(io::Error::other)?;
        let root = config
            .run_root
            .map_or_else(|| default_run_root(test_name), |root| root.join(test_name));
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
        })
    }

    /// Returns the directory holding this test's artifacts.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `value` as canonical JSON.
    pub fn write_json<T: Serialize>(&self, name: &str, value: &T) -> io::Result<PathBuf> {
        let path = self.root.join(name);
        let bytes = serde_jcs::to_vec(value).map_err(|err| io::Error::other(err.to_string()))?;
        fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Writes a UTF-8 text artifact.
    pub fn write_text(&self, name: &str, value: &str) -> io::Result<PathBuf> {
        let path = self.root.join(name);
        fs::write(&path, value.as_bytes())?;
        Ok(path)
    }
}

/// Writes `summary.json` and `summary.md` for a test, even when it panics.
pub struct TestReporter {
    artifacts: TestArtifacts,
    test_name: String,
    started_at_ms: u128,
    harness_run: Option<HarnessRunSummary>,
    finalized: bool,
}

impl TestReporter {
    /// Creates a reporter for the named test.
    pub fn new(test_name: &str) -> io::Result<Self> {
        Ok(Self {
            artifacts: TestArtifacts::new(test_name)?,
            test_name: test_name.to_string(),
            started_at_ms: now_millis(),
            harness_run: None,
            finalized: false,
        })
    }

    /// Returns the test's artifact directory.
    pub fn artifacts(&self) -> &TestArtifacts {
        &self.artifacts
    }

    /// Writes `report` as `run_report.json` and folds it into the summary.
    pub fn write_run_report(&mut self, report: &RunReport) -> io::Result<PathBuf> {
        self.harness_run = Some(HarnessRunSummary::from_report(report));
        self.artifacts.write_json("run_report.json", report)
    }

    /// Writes the final summary with the test's verdict.
    pub fn finish(
        &mut self,
        status: &str,
        notes: Vec<String>,
        artifacts: Vec<String>,
    ) -> io::Result<()> {
        let ended_at_ms = now_millis();
        let summary = TestSummary {
            test_name: self.test_name.clone(),
            status: status.to_string(),
            started_at_ms: self.started_at_ms,
            ended_at_ms,
            duration_ms: ended_at_ms.saturating_sub(self.started_at_ms),
            harness_run: self.harness_run.clone(),
            notes,
            artifacts,
        };
        self.artifacts.write_json("summary.json", &summary)?;
        self.artifacts.write_text("summary.md", &summary_markdown(&summary))?;
        self.finalized = true;
        Ok(())
    }
}

impl Drop for TestReporter {
    fn drop(&mut self) {
        if self.finalized {
            return;
        }
        let status = if std::thread::panicking() { "panic" } else { "unknown" };
        let _ = self.finish(
            status,
            vec!["test terminated without explicit summary".to_string()],
            Vec::new(),
        );
    }
}

fn summary_markdown(summary: &TestSummary) -> String {
    let mut out = String::new();
    out.push_str("# Ledger Harness System-Test Summary\n\n");
    out.push_str("## Status\n\n");
    let _ = writeln!(out, "- Test: {}", summary.test_name);
    let _ = writeln!(out, "- Status: {}", summary.status);
    let _ = writeln!(out, "- Duration (ms): {}", summary.duration_ms);
    if let Some(run) = &summary.harness_run {
        push_harness_run(&mut out, run);
    }
    out.push_str("\n## Notes\n\n");
    push_list(&mut out, &summary.notes);
    out.push_str("\n## Artifacts\n\n");
    push_list(&mut out, &summary.artifacts);
    out
}

fn push_harness_run(out: &mut String, run: &HarnessRunSummary) {
    out.push_str("\n## Harness Run\n\n");
    let contract = run.contract.as_deref().unwrap_or("not deployed");
    let _ = writeln!(out, "- Contract: {contract}");
    if let Some(error) = &run.setup_error {
        let _ = writeln!(out, "- Setup error: {error}");
    }
    for case in &run.cases {
        match case.error_kind {
            Some(kind) => {
                let _ = writeln!(out, "- Case `{}`: {} ({kind})", case.name, case.outcome);
            }
            None => {
                let _ = writeln!(out, "- Case `{}`: {}", case.name, case.outcome);
            }
        }
    }
}

fn push_list(out: &mut String, items: &[String]) {
    if items.is_empty() {
        out.push_str("- None\n");
    } else {
        for item in items {
            let _ = writeln!(out, "- {item}");
        }
    }
}
