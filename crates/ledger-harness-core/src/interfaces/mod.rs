// crates/ledger-harness-core/src/interfaces/mod.rs
// ============================================================================
// Module: Ledger Harness Interfaces
// Description: Transport-agnostic access to a ledger node.
// Purpose: Define the surface the harness runtime drives.
// Dependencies: async-trait, crate::core, crate::abi
// ============================================================================

//! ## Overview
//! [`LedgerConnection`] is the seam between the harness runtime and a node.
//! Implementations own encoding of the wire protocol and must classify node
//! failures into [`LedgerError`] kinds:
//! - `deploy` fails with [`LedgerError::Deployment`] when the node rejects the
//!   creation (including insufficient gas) and [`LedgerError::Connection`] on
//!   transport failure.
//! - `send` fails with [`LedgerError::Execution`] on revert and
//!   [`LedgerError::ResourceExhausted`] when gas runs out.
//! - `call` never reports resource exhaustion.
//!
//! No implementation may retry on its own.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use ethers_core::abi::Token;

use crate::abi::ContractAbi;
use crate::core::Account;
use crate::core::ContractAddress;
use crate::core::DeployedContract;
use crate::core::GasLimit;
use crate::core::LedgerError;
use crate::core::ResultTuple;
use crate::core::TransactionReceipt;

// ============================================================================
// SECTION: Ledger Connection
// ============================================================================

/// Handle to a remote execution node.
#[async_trait]
pub trait LedgerConnection: Send + Sync {
    /// Returns the accounts the node controls, in a stable order.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Connection`] when the node is unreachable.
    async fn list_accounts(&self) -> Result<Vec<Account>, LedgerError>;

    /// Submits a contract creation and waits until it is confirmed.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Deployment`] when the creation is rejected or
    /// fails, [`LedgerError::Connection`] on transport failure.
    async fn deploy(
        &self,
        payload: &[u8],
        abi: &ContractAbi,
        sender: Account,
        gas: GasLimit,
    ) -> Result<DeployedContract, LedgerError>;

    /// Invokes a state-changing method and waits until it is confirmed.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Execution`] when the method reverts and
    /// [`LedgerError::ResourceExhausted`] when `gas` runs out.
    async fn send(
        &self,
        contract: ContractAddress,
        abi: &ContractAbi,
        method: &str,
        args: &[Token],
        sender: Account,
        gas: GasLimit,
    ) -> Result<TransactionReceipt, LedgerError>;

    /// Invokes a read-only method without mutating state.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Execution`] when the method traps or returns no
    /// decodable data.
    async fn call(
        &self,
        contract: ContractAddress,
        abi: &ContractAbi,
        method: &str,
        args: &[Token],
    ) -> Result<ResultTuple, LedgerError>;

    /// Returns the latest block number.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Connection`] when the node is unreachable.
    async fn block_number(&self) -> Result<u64, LedgerError>;
}
