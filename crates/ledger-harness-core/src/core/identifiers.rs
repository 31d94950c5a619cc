// crates/ledger-harness-core/src/core/identifiers.rs
// ============================================================================
// Module: Ledger Identifiers
// Description: Account, contract, and transaction identifiers.
// Purpose: Provide strongly typed identifiers with canonical hex wire forms.
// Dependencies: ethers-core, hex, serde
// ============================================================================

//! ## Overview
//! Identifiers are opaque to the harness. They are parsed from node responses
//! and rendered back as `0x`-prefixed lowercase hex, so two identifiers
//! compare equal regardless of the checksum casing the node used.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use ethers_core::types::Address;
use ethers_core::types::H256;
use serde::Deserialize;
use serde::Serialize;

use crate::core::LedgerError;

// ============================================================================
// SECTION: Hex Helpers
// ============================================================================

/// Encodes bytes as `0x`-prefixed lowercase hex.
#[must_use]
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decodes a hex string with or without a `0x` prefix.
///
/// # Errors
///
/// Returns a message when the input contains non-hex characters or an odd
/// number of digits.
pub fn decode_hex(raw: &str) -> Result<Vec<u8>, String> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(digits).map_err(|err| format!("invalid hex `{trimmed}`: {err}"))
}

/// Decodes a hex string into exactly `N` bytes.
fn decode_fixed<const N: usize>(raw: &str, label: &str) -> Result<[u8; N], LedgerError> {
    let bytes = decode_hex(raw).map_err(|err| LedgerError::Protocol(format!("{label}: {err}")))?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| {
        LedgerError::Protocol(format!("{label} must be {N} bytes, got {}", bytes.len()))
    })
}

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Identity capable of signing and sending transactions.
///
/// # Invariants
/// - Supplied by the node; immutable for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Account(Address);

impl Account {
    /// Wraps a raw address.
    #[must_use]
    pub const fn new(address: Address) -> Self {
        Self(address)
    }

    /// Parses an account from hex text.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Protocol`] when the text is not a 20-byte hex value.
    pub fn parse(raw: &str) -> Result<Self, LedgerError> {
        decode_fixed::<20>(raw, "account").map(|bytes| Self(Address::from(bytes)))
    }

    /// Returns the underlying address.
    #[must_use]
    pub const fn address(self) -> Address {
        self.0
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_hex(self.0.as_bytes()))
    }
}

/// Address of a deployed contract instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractAddress(Address);

impl ContractAddress {
    /// Wraps a raw address.
    #[must_use]
    pub const fn new(address: Address) -> Self {
        Self(address)
    }

    /// Parses a contract address from hex text.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Protocol`] when the text is not a 20-byte hex value.
    pub fn parse(raw: &str) -> Result<Self, LedgerError> {
        decode_fixed::<20>(raw, "contract address").map(|bytes| Self(Address::from(bytes)))
    }

    /// Returns the underlying address.
    #[must_use]
    pub const fn address(self) -> Address {
        self.0
    }
}

impl fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_hex(self.0.as_bytes()))
    }
}

/// Hash identifying a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(H256);

impl TxHash {
    /// Wraps a raw 32-byte hash.
    #[must_use]
    pub const fn new(hash: H256) -> Self {
        Self(hash)
    }

    /// Parses a transaction hash from hex text.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Protocol`] when the text is not a 32-byte hex value.
    pub fn parse(raw: &str) -> Result<Self, LedgerError> {
        decode_fixed::<32>(raw, "transaction hash").map(|bytes| Self(H256::from(bytes)))
    }

    /// Returns the underlying hash.
    #[must_use]
    pub const fn hash(self) -> H256 {
        self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_hex(self.0.as_bytes()))
    }
}
