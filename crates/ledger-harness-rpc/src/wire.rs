// crates/ledger-harness-rpc/src/wire.rs
// ============================================================================
// Module: Ledger Wire Types
// Description: JSON shapes for transactions, calls, and receipts.
// Purpose: Convert between node JSON and the harness record types.
// Dependencies: serde, ledger-harness-core
// ============================================================================

//! ## Overview
//! Quantities travel as `0x`-prefixed hex without leading zeros, data and
//! addresses as `0x`-prefixed hex. Receipts are parsed strictly: a malformed
//! field is a [`LedgerError::Protocol`].

use ledger_harness_core::Account;
use ledger_harness_core::ContractAddress;
use ledger_harness_core::GasLimit;
use ledger_harness_core::LedgerError;
use ledger_harness_core::ReceiptStatus;
use ledger_harness_core::TransactionReceipt;
use ledger_harness_core::TxHash;
use ledger_harness_core::core::encode_hex;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Quantities
// ============================================================================

/// Encodes a quantity as minimal `0x` hex.
#[must_use]
pub fn encode_quantity(value: u64) -> String {
    format!("0x{value:x}")
}

/// Decodes a `0x` hex quantity.
///
/// # Errors
///
/// Returns [`LedgerError::Protocol`] when the text is not a hex quantity that
/// fits in 64 bits.
pub fn decode_quantity(raw: &str) -> Result<u64, LedgerError> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .ok_or_else(|| LedgerError::Protocol(format!("quantity `{raw}` lacks 0x prefix")))?;
    if digits.is_empty() {
        return Err(LedgerError::Protocol("empty quantity".to_string()));
    }
    u64::from_str_radix(digits, 16)
        .map_err(|err| LedgerError::Protocol(format!("invalid quantity {raw}: {err}")))
}

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Parameters of `eth_sendTransaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequestWire {
    /// Sending account.
    pub from: String,
    /// Target contract; absent for contract creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Gas limit quantity.
    pub gas: String,
    /// Call data or creation payload.
    pub data: String,
}

impl TransactionRequestWire {
    /// Builds a contract-creation request.
    #[must_use]
    pub fn creation(sender: Account, payload: &[u8], gas: GasLimit) -> Self {
        Self {
            from: sender.to_string(),
            to: None,
            gas: encode_quantity(gas.get()),
            data: encode_hex(payload),
        }
    }

    /// Builds a method-invocation request.
    #[must_use]
    pub fn invocation(
        sender: Account,
        contract: ContractAddress,
        data: &[u8],
        gas: GasLimit,
    ) -> Self {
        Self {
            from: sender.to_string(),
            to: Some(contract.to_string()),
            gas: encode_quantity(gas.get()),
            data: encode_hex(data),
        }
    }
}

/// Parameters of `eth_call`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRequestWire {
    /// Target contract.
    pub to: String,
    /// Call data.
    pub data: String,
}

impl CallRequestWire {
    /// Builds a read-only call request.
    #[must_use]
    pub fn new(contract: ContractAddress, data: &[u8]) -> Self {
        Self {
            to: contract.to_string(),
            data: encode_hex(data),
        }
    }
}

// ============================================================================
// SECTION: Receipts
// ============================================================================

/// Result of `eth_getTransactionReceipt`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptWire {
    /// Transaction hash.
    pub transaction_hash: String,
    /// Including block; `None` while pending.
    #[serde(default)]
    pub block_number: Option<String>,
    /// Gas consumed.
    pub gas_used: String,
    /// `0x1` on success, `0x0` on failure; absent on pre-byzantium nodes.
    #[serde(default)]
    pub status: Option<String>,
    /// Created contract address.
    #[serde(default)]
    pub contract_address: Option<String>,
}

impl ReceiptWire {
    /// Converts into a typed receipt.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Protocol`] when a field is malformed or the
    /// receipt is still pending.
    pub fn into_receipt(self) -> Result<TransactionReceipt, LedgerError> {
        let block = self.block_number.ok_or_else(|| {
            LedgerError::Protocol(format!("receipt {} has no block number", self.transaction_hash))
        })?;
        let status = match self.status.as_deref() {
            None => ReceiptStatus::Success,
            Some(raw) => match decode_quantity(raw)? {
                0 => ReceiptStatus::Failure,
                1 => ReceiptStatus::Success,
                other => {
                    return Err(LedgerError::Protocol(format!("unknown receipt status {other}")));
                }
            },
        };
        let contract_address =
            self.contract_address.as_deref().map(ContractAddress::parse).transpose()?;
        Ok(TransactionReceipt {
            transaction_hash: TxHash::parse(&self.transaction_hash)?,
            block_number: decode_quantity(&block)?,
            gas_used: decode_quantity(&self.gas_used)?,
            status,
            contract_address,
        })
    }
}
