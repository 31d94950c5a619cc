// crates/ledger-harness-core/src/runtime/students.rs
// ============================================================================
// Module: Students Contract
// Description: Typed wrapper for the enrollment contract's two methods.
// Dependencies: crate::runtime::contract, ethers-core
// ============================================================================

//! ## Overview
//! [`StudentsContract`] exposes `enroll` and `lookup_by_account` over a
//! [`ContractHandle`]. Lookups return a [`StudentView`] whose age is decimal
//! text; accounts that never enrolled yield [`StudentView::sentinel`].

use ethers_core::abi::Token;
use ethers_core::types::U256;

use crate::core::Account;
use crate::core::GasLimit;
use crate::core::LedgerError;
use crate::core::StudentRecord;
use crate::core::StudentView;
use crate::core::TransactionReceipt;
use crate::runtime::ContractHandle;

/// ABI name of the state-changing enrollment method.
pub const ENROLL_METHOD: &str = "enrollStudent";
/// ABI name of the read-only lookup method.
pub const LOOKUP_METHOD: &str = "getEnrolledStudentByAddress";

/// Enrollment contract bound to a deployed instance.
#[derive(Debug, Clone)]
pub struct StudentsContract {
    /// Underlying contract handle.
    handle: ContractHandle,
}

impl StudentsContract {
    /// Wraps a contract handle.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Abi`] when the ABI lacks either method.
    pub fn new(handle: ContractHandle) -> Result<Self, LedgerError> {
        for method in [ENROLL_METHOD, LOOKUP_METHOD] {
            if !handle.abi().has_method(method) {
                return Err(LedgerError::Abi(format!("students abi declares no `{method}`")));
            }
        }
        Ok(Self {
            handle,
        })
    }

    /// Returns the underlying handle.
    #[must_use]
    pub const fn handle(&self) -> &ContractHandle {
        &self.handle
    }

    /// Enrolls `record` under `sender`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Execution`] when the contract reverts and
    /// [`LedgerError::ResourceExhausted`] when `gas` runs out.
    pub async fn enroll(
        &self,
        record: &StudentRecord,
        sender: Account,
        gas: GasLimit,
    ) -> Result<TransactionReceipt, LedgerError> {
        let args = [Token::String(record.name.clone()), Token::Uint(U256::from(record.age))];
        self.handle.invoke(ENROLL_METHOD, &args, sender, gas).await
    }

    /// Looks up the record stored for `account`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Execution`] when the call traps and
    /// [`LedgerError::Abi`] when the result is not `(text, numeric_text)`.
    pub async fn lookup_by_account(&self, account: Account) -> Result<StudentView, LedgerError> {
        let args = [Token::Address(account.address())];
        let tuple = self.handle.query(LOOKUP_METHOD, &args).await?;
        StudentView::from_tuple(&tuple)
    }
}
