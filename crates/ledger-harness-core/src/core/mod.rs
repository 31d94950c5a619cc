// crates/ledger-harness-core/src/core/mod.rs
// ============================================================================
// Module: Ledger Harness Core Types
// Description: Identifiers, records, limits, and errors shared by all crates.
// Purpose: Keep the data model in one place with stable wire forms.
// Dependencies: ethers-core, serde, thiserror
// ============================================================================

//! ## Overview
//! Core data types for the ledger harness. Identifiers wrap 20- and 32-byte
//! values and always render as `0x`-prefixed lowercase hex.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod error;
pub mod identifiers;
pub mod limits;
pub mod records;


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use error::LedgerError;
pub use identifiers::Account;
pub use identifiers::ContractAddress;
pub use identifiers::TxHash;
pub use identifiers::decode_hex;
pub use identifiers::encode_hex;
pub use limits::DEFAULT_GAS_LIMIT;
pub use limits::GasLimit;
pub use records::DeployedContract;
pub use records::ReceiptStatus;
pub use records::ResultField;
pub use records::ResultTuple;
pub use records::StudentRecord;
pub use records::StudentView;
pub use records::TransactionReceipt;
