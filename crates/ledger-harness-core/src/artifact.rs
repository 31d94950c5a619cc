// crates/ledger-harness-core/src/artifact.rs
// ============================================================================
// Module: Contract Artifacts
// Description: Sources that supply an ABI and a bytecode image.
// Purpose: Load compiled contract artifacts without coupling to a compiler.
// Dependencies: serde_json, std
// ============================================================================

//! ## Overview
//! An [`ArtifactSource`] yields a [`ContractArtifact`]: the parsed ABI plus the
//! raw bytecode that is submitted verbatim as a deployment payload.
//! [`FileArtifactSource`] reads either a combined JSON document
//! (`{"abi": [...], "bytecode": "0x..."}`, where `bytecode` may also be a solc
//! style `{"object": "..."}`) or an `.abi` / `.bin` file pair.
//! Invariants:
//! - Artifact files larger than [`MAX_ARTIFACT_BYTES`] are rejected.
//! - An empty bytecode image is rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use serde_json::Value;

use crate::abi::ContractAbi;
use crate::core::LedgerError;
use crate::core::decode_hex;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum size of a single artifact file.
pub const MAX_ARTIFACT_BYTES: u64 = 8 * 1024 * 1024;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Compiled contract: ABI plus bytecode image.
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    /// Parsed ABI.
    pub abi: ContractAbi,
    /// Creation bytecode.
    pub bytecode: Vec<u8>,
}

impl ContractArtifact {
    /// Builds an artifact from an ABI document and hex bytecode.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Abi`] for an invalid ABI and
    /// [`LedgerError::Artifact`] for empty or non-hex bytecode.
    pub fn from_parts(abi_json: &str, bytecode_hex: &str) -> Result<Self, LedgerError> {
        Ok(Self {
            abi: ContractAbi::from_json_str(abi_json)?,
            bytecode: parse_bytecode(bytecode_hex)?,
        })
    }
}

/// Supplies a compiled contract artifact.
pub trait ArtifactSource: Send + Sync {
    /// Loads the artifact.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when the artifact cannot be read or parsed.
    fn load(&self) -> Result<ContractArtifact, LedgerError>;

    /// Returns a short description of where the artifact comes from.
    fn describe(&self) -> String;
}

// ============================================================================
// SECTION: Inline Source
// ============================================================================

/// Artifact held in memory.
#[derive(Debug, Clone)]
pub struct InlineArtifactSource {
    /// ABI JSON document.
    abi_json: String,
    /// Hex-encoded bytecode.
    bytecode_hex: String,
}

impl InlineArtifactSource {
    /// Creates an inline source.
    #[must_use]
    pub fn new(abi_json: impl Into<String>, bytecode_hex: impl Into<String>) -> Self {
        Self {
            abi_json: abi_json.into(),
            bytecode_hex: bytecode_hex.into(),
        }
    }
}

impl ArtifactSource for InlineArtifactSource {
    fn load(&self) -> Result<ContractArtifact, LedgerError> {
        ContractArtifact::from_parts(&self.abi_json, &self.bytecode_hex)
    }

    fn describe(&self) -> String {
        "inline artifact".to_string()
    }
}

// ============================================================================
// SECTION: File Source
// ============================================================================

/// On-disk layout of an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ArtifactLocation {
    /// One JSON document holding both `abi` and `bytecode`.
    Combined(PathBuf),
    /// Separate ABI JSON and hex bytecode files.
    Pair {
        /// ABI JSON file.
        abi: PathBuf,
        /// Hex bytecode file.
        bin: PathBuf,
    },
}

/// Artifact read from the filesystem on every load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileArtifactSource {
    /// Where the artifact lives.
    location: ArtifactLocation,
}

impl FileArtifactSource {
    /// Reads a combined JSON artifact.
    #[must_use]
    pub fn combined(path: impl Into<PathBuf>) -> Self {
        Self {
            location: ArtifactLocation::Combined(path.into()),
        }
    }

    /// Reads an ABI file and a bytecode file.
    #[must_use]
    pub fn pair(abi: impl Into<PathBuf>, bin: impl Into<PathBuf>) -> Self {
        Self {
            location: ArtifactLocation::Pair {
                abi: abi.into(),
                bin: bin.into(),
            },
        }
    }

    /// Reads `<stem>.abi` and `<stem>.bin` from a directory.
    #[must_use]
    pub fn from_stem(dir: &Path, stem: &str) -> Self {
        Self::pair(dir.join(format!("{stem}.abi")), dir.join(format!("{stem}.bin")))
    }
}

impl ArtifactSource for FileArtifactSource {
    fn load(&self) -> Result<ContractArtifact, LedgerError> {
        match &self.location {
            ArtifactLocation::Combined(path) => load_combined(path),
            ArtifactLocation::Pair {
                abi,
                bin,
            } => {
                let abi_json = read_capped(abi)?;
                let bytecode_hex = read_capped(bin)?;
                ContractArtifact::from_parts(&abi_json, &bytecode_hex)
            }
        }
    }

    fn describe(&self) -> String {
        match &self.location {
            ArtifactLocation::Combined(path) => path.display().to_string(),
            ArtifactLocation::Pair {
                abi,
                bin,
            } => format!("{} + {}", abi.display(), bin.display()),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads a combined `{abi, bytecode}` document.
fn load_combined(path: &Path) -> Result<ContractArtifact, LedgerError> {
    let raw = read_capped(path)?;
    let mut document: Value = serde_json::from_str(&raw).map_err(|err| {
        LedgerError::Artifact(format!("{} is not valid json: {err}", path.display()))
    })?;
    let abi = document
        .get_mut("abi")
        .map(Value::take)
        .ok_or_else(|| LedgerError::Artifact(format!("{} has no `abi` field", path.display())))?;
    let bytecode_hex = match document.get("bytecode") {
        Some(Value::String(hex)) => hex.clone(),
        Some(Value::Object(object)) => object
            .get("object")
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .ok_or_else(|| {
                LedgerError::Artifact(format!("{} bytecode has no `object`", path.display()))
            })?,
        _ => {
            return Err(LedgerError::Artifact(format!(
                "{} has no `bytecode` field",
                path.display()
            )));
        }
    };
    Ok(ContractArtifact {
        abi: ContractAbi::from_json_value(abi)?,
        bytecode: parse_bytecode(&bytecode_hex)?,
    })
}

/// Reads a UTF-8 file, refusing anything over [`MAX_ARTIFACT_BYTES`].
fn read_capped(path: &Path) -> Result<String, LedgerError> {
    let file = File::open(path)
        .map_err(|err| LedgerError::Artifact(format!("{}: {err}", path.display())))?;
    let mut limited = file.take(MAX_ARTIFACT_BYTES.saturating_add(1));
    let mut text = String::new();
    limited
        .read_to_string(&mut text)
        .map_err(|err| LedgerError::Artifact(format!("{}: {err}", path.display())))?;
    if u64::try_from(text.len()).unwrap_or(u64::MAX) > MAX_ARTIFACT_BYTES {
        return Err(LedgerError::Artifact(format!(
            "{} exceeds {MAX_ARTIFACT_BYTES} bytes",
            path.display()
        )));
    }
    Ok(text)
}

/// Decodes a non-empty hex bytecode image.
fn parse_bytecode(raw: &str) -> Result<Vec<u8>, LedgerError> {
    let bytes = decode_hex(raw).map_err(|err| LedgerError::Artifact(format!("bytecode: {err}")))?;
    if bytes.is_empty() {
        return Err(LedgerError::Artifact("bytecode is empty".to_string()));
    }
    Ok(bytes)
}
