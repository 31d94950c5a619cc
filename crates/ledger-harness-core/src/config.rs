// crates/ledger-harness-core/src/config.rs
// ============================================================================
// Module: Harness Configuration
// Description: TOML-backed settings for node access, gas, and timeouts.
// Purpose: Provide validated configuration with defaults for a local node.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! [`HarnessConfig`] captures every tunable the harness needs. All fields
//! have defaults matching a local development node at `127.0.0.1:7545` with a
//! one-million gas budget, so an empty TOML document is a valid config.
//! Invariants:
//! - `validate` rejects zero budgets and non-HTTP endpoints.
//! - Unknown keys are rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use url::Url;

use crate::core::DEFAULT_GAS_LIMIT;
use crate::core::GasLimit;
use crate::core::LedgerError;
use crate::runtime::HarnessSettings;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default node endpoint.
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:7545";
/// Default HTTP request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
/// Default per-case timeout in milliseconds.
pub const DEFAULT_CASE_TIMEOUT_MS: u64 = 30_000;
/// Default interval between receipt polls in milliseconds.
pub const DEFAULT_RECEIPT_POLL_INTERVAL_MS: u64 = 100;
/// Default number of receipt polls before giving up.
pub const DEFAULT_RECEIPT_POLL_ATTEMPTS: u32 = 50;

/// Serde default for `rpc_url`.
fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}

/// Serde default for `gas_limit`.
const fn default_gas_limit() -> u64 {
    DEFAULT_GAS_LIMIT
}

/// Serde default for `request_timeout_ms`.
const fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

/// Serde default for `case_timeout_ms`.
const fn default_case_timeout_ms() -> u64 {
    DEFAULT_CASE_TIMEOUT_MS
}

/// Serde default for `receipt_poll_interval_ms`.
const fn default_receipt_poll_interval_ms() -> u64 {
    DEFAULT_RECEIPT_POLL_INTERVAL_MS
}

/// Serde default for `receipt_poll_attempts`.
const fn default_receipt_poll_attempts() -> u32 {
    DEFAULT_RECEIPT_POLL_ATTEMPTS
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Destination for harness audit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditLogMode {
    /// Discard events.
    #[default]
    None,
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to `path`.
    File,
}

/// Audit log settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditLogConfig {
    /// Where events go.
    #[serde(default)]
    pub mode: AuditLogMode,
    /// Log file for [`AuditLogMode::File`].
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Harness configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// JSON-RPC endpoint of the node.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Gas budget for deployment and every state-changing call.
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
    /// Timeout for one HTTP request.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Timeout for one harness case.
    #[serde(default = "default_case_timeout_ms")]
    pub case_timeout_ms: u64,
    /// Delay between receipt polls.
    #[serde(default = "default_receipt_poll_interval_ms")]
    pub receipt_poll_interval_ms: u64,
    /// Receipt polls before a confirmation wait gives up.
    #[serde(default = "default_receipt_poll_attempts")]
    pub receipt_poll_attempts: u32,
    /// Index into the node's account list used as deployer.
    #[serde(default)]
    pub deployer_index: usize,
    /// Audit log settings.
    #[serde(default)]
    pub audit_log: AuditLogConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            gas_limit: DEFAULT_GAS_LIMIT,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            case_timeout_ms: DEFAULT_CASE_TIMEOUT_MS,
            receipt_poll_interval_ms: DEFAULT_RECEIPT_POLL_INTERVAL_MS,
            receipt_poll_attempts: DEFAULT_RECEIPT_POLL_ATTEMPTS,
            deployer_index: 0,
            audit_log: AuditLogConfig::default(),
        }
    }
}

impl HarnessConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Config`] when the document is malformed or fails
    /// validation.
    pub fn from_toml_str(raw: &str) -> Result<Self, LedgerError> {
        let config: Self = toml::from_str(raw)
            .map_err(|err| LedgerError::Config(format!("invalid harness config: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Config`] when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, LedgerError> {
        let raw = fs::read_to_string(path)
            .map_err(|err| LedgerError::Config(format!("{}: {err}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    /// Validates field values.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<(), LedgerError> {
        let url = Url::parse(&self.rpc_url)
            .map_err(|err| LedgerError::Config(format!("rpc_url is not a valid url: {err}")))?;
        if url.scheme() != "http" {
            return Err(LedgerError::Config(format!(
                "rpc_url must use http, got {}",
                url.scheme()
            )));
        }
        if url.host_str().is_none() {
            return Err(LedgerError::Config("rpc_url must include a host".to_string()));
        }
        let positive = [
            ("gas_limit", self.gas_limit),
            ("request_timeout_ms", self.request_timeout_ms),
            ("case_timeout_ms", self.case_timeout_ms),
            ("receipt_poll_interval_ms", self.receipt_poll_interval_ms),
            ("receipt_poll_attempts", u64::from(self.receipt_poll_attempts)),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(LedgerError::Config(format!("{name} must be greater than zero")));
            }
        }
        if self.audit_log.mode == AuditLogMode::File && self.audit_log.path.is_none() {
            return Err(LedgerError::Config(
                "audit_log.path is required when audit_log.mode = \"file\"".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the gas budget.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Config`] when `gas_limit` is zero.
    pub fn gas_limit(&self) -> Result<GasLimit, LedgerError> {
        GasLimit::from_raw(self.gas_limit)
            .ok_or_else(|| LedgerError::Config("gas_limit must be greater than zero".to_string()))
    }

    /// Returns the HTTP request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Returns the delay between receipt polls.
    #[must_use]
    pub const fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }

    /// Returns the runtime settings derived from this config.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Config`] when `gas_limit` is zero.
    pub fn harness_settings(&self) -> Result<HarnessSettings, LedgerError> {
        Ok(HarnessSettings {
            gas_limit: self.gas_limit()?,
            case_timeout: Duration::from_millis(self.case_timeout_ms),
            deployer_index: self.deployer_index,
        })
    }
}
