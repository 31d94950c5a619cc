// crates/ledger-harness-core/src/core/records.rs
// ============================================================================
// Module: Ledger Records
// Description: Receipts, deployed contracts, result tuples, and student records.
// Purpose: Model node results without eagerly coercing the ledger encoding.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Read-only calls return a [`ResultTuple`]: a fixed-arity record whose fields
//! carry their own kind. Unsigned and signed integers are kept as decimal
//! text ([`ResultField::NumericText`]) because that is how the node's encoding
//! reaches callers; comparisons against them must be textual.
//! Invariants:
//! - A missing student record is the sentinel `("", "0")`, never an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::abi::ContractAbi;
use crate::core::ContractAddress;
use crate::core::LedgerError;
use crate::core::TxHash;

// ============================================================================
// SECTION: Receipts
// ============================================================================

/// Execution status reported by a mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatus {
    /// Transaction applied its effects.
    Success,
    /// Transaction was mined but reverted all effects.
    Failure,
}

/// Confirmation record for a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    /// Hash of the confirmed transaction.
    pub transaction_hash: TxHash,
    /// Block that included the transaction.
    pub block_number: u64,
    /// Gas consumed by execution.
    pub gas_used: u64,
    /// Execution status.
    pub status: ReceiptStatus,
    /// Address created by a contract-creation transaction.
    pub contract_address: Option<ContractAddress>,
}

impl TransactionReceipt {
    /// Returns true when the transaction applied its effects.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.status == ReceiptStatus::Success
    }
}

// ============================================================================
// SECTION: Deployed Contract
// ============================================================================

/// A contract instance created by a confirmed deployment.
///
/// # Invariants
/// - `address` equals `receipt.contract_address`.
#[derive(Debug, Clone)]
pub struct DeployedContract {
    /// Address of the deployed instance.
    pub address: ContractAddress,
    /// ABI describing the instance's methods.
    pub abi: ContractAbi,
    /// Receipt of the creation transaction.
    pub receipt: TransactionReceipt,
}

// ============================================================================
// SECTION: Result Tuples
// ============================================================================

/// One decoded output value, tagged with its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResultField {
    /// UTF-8 text.
    Text(String),
    /// Integer rendered as decimal text.
    NumericText(String),
    /// Address rendered as `0x`-prefixed lowercase hex.
    Address(String),
    /// Boolean flag.
    Bool(bool),
    /// Raw bytes rendered as `0x`-prefixed lowercase hex.
    Bytes(String),
    /// Array or nested tuple.
    List(Vec<ResultField>),
}

impl ResultField {
    /// Returns a stable label for the field kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::NumericText(_) => "numeric_text",
            Self::Address(_) => "address",
            Self::Bool(_) => "bool",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
        }
    }

    /// Returns the textual form for text-like fields.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value)
            | Self::NumericText(value)
            | Self::Address(value)
            | Self::Bytes(value) => Some(value),
            Self::Bool(_) | Self::List(_) => None,
        }
    }
}

/// Fixed-arity output of a read-only call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultTuple(Vec<ResultField>);

impl ResultTuple {
    /// Builds a tuple from decoded fields.
    #[must_use]
    pub const fn new(fields: Vec<ResultField>) -> Self {
        Self(fields)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.0.len()
    }

    /// Returns the field at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ResultField> {
        self.0.get(index)
    }

    /// Returns all fields.
    #[must_use]
    pub fn fields(&self) -> &[ResultField] {
        &self.0
    }

    /// Returns the text of a [`ResultField::Text`] field.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Abi`] when the field is missing or not text.
    pub fn text_at(&self, index: usize) -> Result<&str, LedgerError> {
        match self.0.get(index) {
            Some(ResultField::Text(value)) => Ok(value),
            Some(other) => Err(LedgerError::Abi(format!(
                "field {index} is {}, expected text",
                other.kind()
            ))),
            None => Err(missing_field(index, self.0.len())),
        }
    }

    /// Returns the decimal text of a [`ResultField::NumericText`] field.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Abi`] when the field is missing or not numeric.
    pub fn numeric_text_at(&self, index: usize) -> Result<&str, LedgerError> {
        match self.0.get(index) {
            Some(ResultField::NumericText(value)) => Ok(value),
            Some(other) => Err(LedgerError::Abi(format!(
                "field {index} is {}, expected numeric_text",
                other.kind()
            ))),
            None => Err(missing_field(index, self.0.len())),
        }
    }
}

/// Builds the error for an out-of-range field index.
fn missing_field(index: usize, arity: usize) -> LedgerError {
    LedgerError::Abi(format!("field {index} out of range for tuple of arity {arity}"))
}

// ============================================================================
// SECTION: Students
// ============================================================================

/// Input for an enrollment call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Student name.
    pub name: String,
    /// Student age.
    pub age: u64,
}

impl StudentRecord {
    /// Creates a record.
    #[must_use]
    pub fn new(name: impl Into<String>, age: u64) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }

    /// Returns the view a lookup is expected to produce after enrollment.
    #[must_use]
    pub fn expected_view(&self) -> StudentView {
        StudentView {
            name: self.name.clone(),
            age: self.age.to_string(),
        }
    }
}

/// Student record as returned by a lookup: both fields are text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentView {
    /// Student name; empty when no record exists.
    pub name: String,
    /// Student age as decimal text; `"0"` when no record exists.
    pub age: String,
}

impl StudentView {
    /// Returns the sentinel view for accounts that never enrolled.
    #[must_use]
    pub fn sentinel() -> Self {
        Self {
            name: String::new(),
            age: "0".to_string(),
        }
    }

    /// Returns true when the view equals the sentinel default.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.name.is_empty() && self.age == "0"
    }

    /// Extracts a view from a `(text, numeric_text)` tuple.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Abi`] when the tuple has the wrong arity or kinds.
    pub fn from_tuple(tuple: &ResultTuple) -> Result<Self, LedgerError> {
        if tuple.arity() != 2 {
            return Err(LedgerError::Abi(format!(
                "student lookup returned {} fields, expected 2",
                tuple.arity()
            )));
        }
        Ok(Self {
            name: tuple.text_at(0)?.to_string(),
            age: tuple.numeric_text_at(1)?.to_string(),
        })
    }
}

impl std::fmt::Display for StudentView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(\"{}\", \"{}\")", self.name, self.age)
    }
}
