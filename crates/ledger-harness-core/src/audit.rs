// crates/ledger-harness-core/src/audit.rs
// ============================================================================
// Module: Harness Audit Logging
// Description: Structured events for setup, deployment, and case execution.
// Purpose: Emit JSON-line logs without a hard logging dependency.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The harness reports its lifecycle as [`HarnessAuditEvent`] values written
//! through a [`HarnessAuditSink`]. Sinks serialize one JSON object per line so
//! runs can be inspected or piped into any log pipeline.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::config::AuditLogConfig;
use crate::config::AuditLogMode;
use crate::core::LedgerError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Harness lifecycle event.
#[derive(Debug, Clone, Serialize)]
pub struct HarnessAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Case name for case events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case: Option<String>,
    /// Contract address once deployed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract: Option<String>,
    /// Outcome label (`pass`, `fail`, `timed_out`, `ok`, `error`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<&'static str>,
    /// Error kind label when the event reports a failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    /// Free-form detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Elapsed time for the reported step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,
}

impl HarnessAuditEvent {
    /// Creates an event stamped with the current time.
    #[must_use]
    pub fn new(event: &'static str) -> Self {
        Self {
            event,
            timestamp_ms: now_millis(),
            case: None,
            contract: None,
            outcome: None,
            error_kind: None,
            message: None,
            duration_ms: None,
        }
    }

    /// Attaches a case name.
    #[must_use]
    pub fn with_case(mut self, case: impl Into<String>) -> Self {
        self.case = Some(case.into());
        self
    }

    /// Attaches a contract address.
    #[must_use]
    pub fn with_contract(mut self, contract: impl Into<String>) -> Self {
        self.contract = Some(contract.into());
        self
    }

    /// Attaches an outcome label.
    #[must_use]
    pub const fn with_outcome(mut self, outcome: &'static str) -> Self {
        self.outcome = Some(outcome);
        self
    }

    /// Attaches the kind and message of an error.
    #[must_use]
    pub fn with_error(mut self, err: &LedgerError) -> Self {
        self.error_kind = Some(err.kind());
        self.message = Some(err.to_string());
        self
    }

    /// Attaches a free-form message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attaches an elapsed duration.
    #[must_use]
    pub const fn with_duration_ms(mut self, duration_ms: u128) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

/// Returns milliseconds since the Unix epoch.
pub(crate) fn now_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for harness events.
pub trait HarnessAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &HarnessAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl HarnessAuditSink for StderrAuditSink {
    fn record(&self, event: &HarnessAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl HarnessAuditSink for FileAuditSink {
    fn record(&self, event: &HarnessAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl HarnessAuditSink for NoopAuditSink {
    fn record(&self, _event: &HarnessAuditEvent) {}
}

// ============================================================================
// SECTION: Construction
// ============================================================================

/// Builds the sink selected by configuration.
///
/// # Errors
///
/// Returns [`LedgerError::Config`] when file mode has no path or the file
/// cannot be opened.
pub fn build_audit_sink(config: &AuditLogConfig) -> Result<Arc<dyn HarnessAuditSink>, LedgerError> {
    match config.mode {
        AuditLogMode::None => Ok(Arc::new(NoopAuditSink)),
        AuditLogMode::Stderr => Ok(Arc::new(StderrAuditSink)),
        AuditLogMode::File => {
            let path = config.path.as_deref().ok_or_else(|| {
                LedgerError::Config("audit_log.path is required for file mode".to_string())
            })?;
            let sink = FileAuditSink::new(path).map_err(|err| {
                LedgerError::Config(format!("open audit log {}: {err}", path.display()))
            })?;
            Ok(Arc::new(sink))
        }
    }
}
