// system-tests/src/config/env.rs
// ============================================================================
// Module: System Test Environment
// Description: Environment-backed configuration for system tests.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std, ledger-harness-core
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8, empty values, and non-positive numbers
//! fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use ledger_harness_core::HarnessConfig;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for system test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTestEnv {
    /// Optional run root override for artifacts.
    RunRoot,
    /// JSON-RPC endpoint of a live node (live-node suites only).
    RpcUrl,
    /// Compiled contract artifact for live-node suites.
    ArtifactPath,
    /// Optional timeout override in seconds (positive integer).
    TimeoutSeconds,
    /// Optional gas limit override (positive integer).
    GasLimit,
}

impl SystemTestEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RunRoot => "LEDGER_HARNESS_SYSTEM_TEST_RUN_ROOT",
            Self::RpcUrl => "LEDGER_HARNESS_SYSTEM_TEST_RPC_URL",
            Self::ArtifactPath => "LEDGER_HARNESS_SYSTEM_TEST_ARTIFACT",
            Self::TimeoutSeconds => "LEDGER_HARNESS_SYSTEM_TEST_TIMEOUT_SEC",
            Self::GasLimit => "LEDGER_HARNESS_SYSTEM_TEST_GAS_LIMIT",
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed system test configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SystemTestConfig {
    /// Optional run root override.
    pub run_root: Option<PathBuf>,
    /// Optional live node endpoint.
    pub rpc_url: Option<String>,
    /// Optional compiled contract artifact.
    pub artifact_path: Option<PathBuf>,
    /// Optional timeout override in seconds (positive integer).
    pub timeout: Option<Duration>,
    /// Optional gas limit override.
    pub gas_limit: Option<u64>,
}

impl SystemTestConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when an environment value is not valid UTF-8, is empty,
    /// or fails validation (for example, a zero timeout or gas limit).
    pub fn load() -> Result<Self, String> {
        let run_root = read_env_nonempty(SystemTestEnv::RunRoot.as_str())?.map(PathBuf::from);
        let rpc_url = read_env_nonempty(SystemTestEnv::RpcUrl.as_str())?;
        let artifact_path =
            read_env_nonempty(SystemTestEnv::ArtifactPath.as_str())?.map(PathBuf::from);
        let timeout = read_env_nonempty(SystemTestEnv::TimeoutSeconds.as_str())?
            .map(|value| parse_positive(SystemTestEnv::TimeoutSeconds.as_str(), &value))
            .transpose()?
            .map(Duration::from_secs);
        let gas_limit = read_env_nonempty(SystemTestEnv::GasLimit.as_str())?
            .map(|value| parse_positive(SystemTestEnv::GasLimit.as_str(), &value))
            .transpose()?;
        Ok(Self {
            run_root,
            rpc_url,
            artifact_path,
            timeout,
            gas_limit,
        })
    }

    /// Builds a harness configuration with the environment overrides applied.
    ///
    /// # Errors
    ///
    /// Returns an error when the resulting configuration fails validation.
    pub fn harness_config(&self) -> Result<HarnessConfig, String> {
        let mut config = HarnessConfig::default();
        if let Some(rpc_url) = &self.rpc_url {
            config.rpc_url.clone_from(rpc_url);
        }
        if let Some(gas_limit) = self.gas_limit {
            config.gas_limit = gas_limit;
        }
        if let Some(timeout) = self.timeout {
            let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
            config.case_timeout_ms = millis;
            config.request_timeout_ms = config.request_timeout_ms.max(millis);
        }
        config.validate().map_err(|err| err.to_string())?;
        Ok(config)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, String> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| format!("{name} must be valid UTF-8"))
    })
}

/// Reads an environment variable and rejects empty values.
///
/// # Errors
///
/// Returns an error when the variable is set but empty or whitespace.
fn read_env_nonempty(name: &str) -> Result<Option<String>, String> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => Err(format!("{name} must not be empty")),
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a positive integer from an environment variable string.
///
/// # Errors
///
/// Returns an error when the value is non-numeric or zero.
fn parse_positive(name: &str, raw: &str) -> Result<u64, String> {
    let value: u64 =
        raw.trim().parse().map_err(|_| format!("{name} must be a positive integer"))?;
    if value == 0 {
        return Err(format!("{name} must be greater than zero"));
    }
    Ok(value)
}
