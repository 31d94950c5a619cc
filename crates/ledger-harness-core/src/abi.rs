// crates/ledger-harness-core/src/abi.rs
// ============================================================================
// Module: Contract ABI
// Description: ABI parsing, call encoding, and typed output decoding.
// Purpose: Translate between host values and the ledger's native encoding.
// Dependencies: ethers-core, serde_json
// ============================================================================

//! ## Overview
//! [`ContractAbi`] wraps a Solidity JSON ABI. It encodes method calls and
//! deployment payloads, and decodes return data into a [`ResultTuple`]
//! whose integer fields stay as decimal text.
//! Invariants:
//! - Unknown methods fail before any request reaches the node.
//! - Empty return data is an execution failure, not a sentinel value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use ethers_core::abi::Abi;
use ethers_core::abi::Function;
use ethers_core::abi::StateMutability;
use ethers_core::abi::Token;
use ethers_core::types::I256;
use serde_json::Value;

use crate::core::LedgerError;
use crate::core::ResultField;
use crate::core::ResultTuple;
use crate::core::encode_hex;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Whether a method mutates contract state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    /// `view` or `pure`: answered by a call, no gas accounting.
    ReadOnly,
    /// `nonpayable` or `payable`: requires a mined transaction.
    StateChanging,
}

/// Parsed contract ABI shared by every handle bound to one deployment.
#[derive(Debug, Clone)]
pub struct ContractAbi {
    /// Parsed ABI entries.
    inner: Arc<Abi>,
}

impl ContractAbi {
    /// Wraps an already parsed ABI.
    #[must_use]
    pub fn new(abi: Abi) -> Self {
        Self {
            inner: Arc::new(abi),
        }
    }

    /// Parses a JSON ABI document (an array of entries).
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Abi`] when the document is not a valid ABI.
    pub fn from_json_str(raw: &str) -> Result<Self, LedgerError> {
        let abi: Abi = serde_json::from_str(raw)
            .map_err(|err| LedgerError::Abi(format!("invalid abi json: {err}")))?;
        Ok(Self::new(abi))
    }

    /// Parses an ABI from an already decoded JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Abi`] when the value is not a valid ABI.
    pub fn from_json_value(value: Value) -> Result<Self, LedgerError> {
        let abi: Abi = serde_json::from_value(value)
            .map_err(|err| LedgerError::Abi(format!("invalid abi json: {err}")))?;
        Ok(Self::new(abi))
    }

    /// Returns the underlying ABI.
    #[must_use]
    pub fn raw(&self) -> &Abi {
        &self.inner
    }

    /// Returns true when the ABI declares a method with this name.
    #[must_use]
    pub fn has_method(&self, name: &str) -> bool {
        self.inner.functions.contains_key(name)
    }

    /// Returns the mutability of a method.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Abi`] when the method is not declared.
    pub fn mutability(&self, name: &str) -> Result<Mutability, LedgerError> {
        let function = self.function(name)?;
        Ok(match function.state_mutability {
            StateMutability::Pure | StateMutability::View => Mutability::ReadOnly,
            StateMutability::NonPayable | StateMutability::Payable => Mutability::StateChanging,
        })
    }

    /// Encodes a method call (selector followed by arguments).
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Abi`] when the method is unknown or the arguments
    /// do not match its inputs.
    pub fn encode_call(&self, name: &str, args: &[Token]) -> Result<Vec<u8>, LedgerError> {
        let function = self.function(name)?;
        function
            .encode_input(args)
            .map_err(|err| LedgerError::Abi(format!("encode {name} arguments: {err}")))
    }

    /// Decodes a method's return data into a typed tuple.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Execution`] when the node returned no data for a
    /// method that declares outputs, and [`LedgerError::Abi`] when the data does
    /// not match the declared outputs.
    pub fn decode_output(&self, name: &str, data: &[u8]) -> Result<ResultTuple, LedgerError> {
        let function = self.function(name)?;
        if data.is_empty() && !function.outputs.is_empty() {
            return Err(LedgerError::Execution(format!(
                "{name} returned no data; the address may not hold this contract"
            )));
        }
        let tokens = function
            .decode_output(data)
            .map_err(|err| LedgerError::Abi(format!("decode {name} output: {err}")))?;
        Ok(ResultTuple::new(tokens.into_iter().map(token_to_field).collect()))
    }

    /// Builds a deployment payload from bytecode and constructor arguments.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Abi`] when arguments are given but the ABI has no
    /// constructor, or when they do not match the constructor inputs.
    pub fn encode_deployment(
        &self,
        bytecode: &[u8],
        constructor_args: &[Token],
    ) -> Result<Vec<u8>, LedgerError> {
        match self.inner.constructor() {
            Some(constructor) => constructor
                .encode_input(bytecode.to_vec(), constructor_args)
                .map_err(|err| LedgerError::Abi(format!("encode constructor arguments: {err}"))),
            None if constructor_args.is_empty() => Ok(bytecode.to_vec()),
            None => Err(LedgerError::Abi(
                "constructor arguments supplied but the abi declares no constructor".to_string(),
            )),
        }
    }

    /// Looks up a method by name.
    fn function(&self, name: &str) -> Result<&Function, LedgerError> {
        self.inner
            .function(name)
            .map_err(|_| LedgerError::Abi(format!("abi declares no method `{name}`")))
    }
}

// ============================================================================
// SECTION: Token Conversion
// ============================================================================

/// Converts a decoded token into a kind-tagged field without numeric coercion.
fn token_to_field(token: Token) -> ResultField {
    match token {
        Token::String(value) => ResultField::Text(value),
        Token::Uint(value) => ResultField::NumericText(value.to_string()),
        Token::Int(value) => ResultField::NumericText(I256::from_raw(value).to_string()),
        Token::Address(value) => ResultField::Address(encode_hex(value.as_bytes())),
        Token::Bool(value) => ResultField::Bool(value),
        Token::Bytes(value) | Token::FixedBytes(value) => ResultField::Bytes(encode_hex(&value)),
        Token::Array(items) | Token::FixedArray(items) | Token::Tuple(items) => {
            ResultField::List(items.into_iter().map(token_to_field).collect())
        }
    }
}
