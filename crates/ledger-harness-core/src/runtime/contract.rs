// crates/ledger-harness-core/src/runtime/contract.rs
// ============================================================================
// Module: Contract Handle
// Description: Typed façade over one deployed contract instance.
// Purpose: Route method invocations to send or call by declared mutability.
// Dependencies: crate::interfaces, crate::abi
// ============================================================================

//! ## Overview
//! A [`ContractHandle`] binds a [`LedgerConnection`] to one deployed address
//! and its ABI. State-changing methods go through [`ContractHandle::invoke`],
//! read-only methods through [`ContractHandle::query`]; using the wrong path
//! is rejected locally before the node is contacted.
//! Invariants:
//! - Query results keep integers as decimal text.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use ethers_core::abi::Token;

use crate::abi::ContractAbi;
use crate::abi::Mutability;
use crate::core::Account;
use crate::core::ContractAddress;
use crate::core::DeployedContract;
use crate::core::GasLimit;
use crate::core::LedgerError;
use crate::core::ResultTuple;
use crate::core::TransactionReceipt;
use crate::interfaces::LedgerConnection;

// ============================================================================
// SECTION: Contract Handle
// ============================================================================

/// Deployed contract bound to the connection that reaches it.
#[derive(Clone)]
pub struct ContractHandle {
    /// Deployment this handle targets.
    deployed: DeployedContract,
    /// Connection used for every invocation.
    connection: Arc<dyn LedgerConnection>,
}

impl ContractHandle {
    /// Binds a deployment to a connection.
    #[must_use]
    pub fn new(deployed: DeployedContract, connection: Arc<dyn LedgerConnection>) -> Self {
        Self {
            deployed,
            connection,
        }
    }

    /// Returns the contract address.
    #[must_use]
    pub const fn address(&self) -> ContractAddress {
        self.deployed.address
    }

    /// Returns the contract ABI.
    #[must_use]
    pub const fn abi(&self) -> &ContractAbi {
        &self.deployed.abi
    }

    /// Returns the deployment record.
    #[must_use]
    pub const fn deployment(&self) -> &DeployedContract {
        &self.deployed
    }

    /// Invokes a state-changing method and waits for confirmation.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Abi`] when the method is unknown or read-only,
    /// otherwise whatever the connection reports for the send.
    pub async fn invoke(
        &self,
        method: &str,
        args: &[Token],
        sender: Account,
        gas: GasLimit,
    ) -> Result<TransactionReceipt, LedgerError> {
        if self.abi().mutability(method)? != Mutability::StateChanging {
            return Err(LedgerError::Abi(format!(
                "{method} is read-only; use query instead of invoke"
            )));
        }
        self.connection.send(self.address(), self.abi(), method, args, sender, gas).await
    }

    /// Invokes a read-only method.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Abi`] when the method is unknown or
    /// state-changing, otherwise whatever the connection reports for the call.
    pub async fn query(&self, method: &str, args: &[Token]) -> Result<ResultTuple, LedgerError> {
        if self.abi().mutability(method)? != Mutability::ReadOnly {
            return Err(LedgerError::Abi(format!(
                "{method} changes state; use invoke instead of query"
            )));
        }
        self.connection.call(self.address(), self.abi(), method, args).await
    }
}

impl fmt::Debug for ContractHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractHandle").field("address", &self.address()).finish_non_exhaustive()
    }
}
