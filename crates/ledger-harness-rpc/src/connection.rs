// crates/ledger-harness-rpc/src/connection.rs
// ============================================================================
// Module: HTTP Ledger Connection
// Description: LedgerConnection over Ethereum-style JSON-RPC.
// Purpose: Deploy, send, and call against a node reachable over HTTP.
// Dependencies: ledger-harness-core, tokio, serde_json
// ============================================================================

//! ## Overview
//! [`HttpLedgerConnection`] implements [`LedgerConnection`] with five node
//! methods: `eth_accounts`, `eth_sendTransaction`, `eth_getTransactionReceipt`,
//! `eth_call`, and `eth_blockNumber`. Transactions are signed by the node for
//! the accounts it controls. Confirmation waits poll for the receipt at a fixed
//! interval for a bounded number of attempts; the transaction itself is never
//! resubmitted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use ethers_core::abi::Token;
use ledger_harness_core::Account;
use ledger_harness_core::ContractAbi;
use ledger_harness_core::ContractAddress;
use ledger_harness_core::DeployedContract;
use ledger_harness_core::GasLimit;
use ledger_harness_core::HarnessConfig;
use ledger_harness_core::LedgerConnection;
use ledger_harness_core::LedgerError;
use ledger_harness_core::ResultTuple;
use ledger_harness_core::TransactionReceipt;
use ledger_harness_core::TxHash;
use ledger_harness_core::config::DEFAULT_RECEIPT_POLL_ATTEMPTS;
use ledger_harness_core::config::DEFAULT_RECEIPT_POLL_INTERVAL_MS;
use ledger_harness_core::core::decode_hex;
use serde_json::json;
use tokio::time::sleep;

use crate::classify::call_error;
use crate::classify::deploy_error;
use crate::classify::failed_creation;
use crate::classify::failed_invocation;
use crate::classify::query_error;
use crate::classify::send_error;
use crate::client::JsonRpcClient;
use crate::client::TranscriptEntry;
use crate::wire::CallRequestWire;
use crate::wire::ReceiptWire;
use crate::wire::TransactionRequestWire;
use crate::wire::decode_quantity;

// ============================================================================
// SECTION: Receipt Polling
// ============================================================================

/// Schedule for confirmation waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptPolling {
    /// Delay between polls.
    pub interval: Duration,
    /// Polls before giving up.
    pub attempts: u32,
}

impl Default for ReceiptPolling {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_RECEIPT_POLL_INTERVAL_MS),
            attempts: DEFAULT_RECEIPT_POLL_ATTEMPTS,
        }
    }
}

// ============================================================================
// SECTION: Connection
// ============================================================================

/// Ledger connection over HTTP JSON-RPC.
#[derive(Debug, Clone)]
pub struct HttpLedgerConnection {
    /// JSON-RPC client bound to the node endpoint.
    client: JsonRpcClient,
    /// Confirmation wait schedule.
    polling: ReceiptPolling,
}

impl HttpLedgerConnection {
    /// Creates a connection to `rpc_url`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Config`] when the HTTP client cannot be built or
    /// `polling` allows zero receipt polls.
    pub fn new(
        rpc_url: impl Into<String>,
        request_timeout: Duration,
        polling: ReceiptPolling,
    ) -> Result<Self, LedgerError> {
        if polling.attempts == 0 {
            return Err(LedgerError::Config(
                "receipt polling needs at least one attempt".to_string(),
            ));
        }
        let client = JsonRpcClient::new(rpc_url, request_timeout)
            .map_err(|err| LedgerError::Config(err.to_string()))?;
        Ok(Self {
            client,
            polling,
        })
    }

    /// Creates a connection from validated harness configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Config`] when the configuration is invalid.
    pub fn from_config(config: &HarnessConfig) -> Result<Self, LedgerError> {
        config.validate()?;
        Self::new(
            config.rpc_url.clone(),
            config.request_timeout(),
            ReceiptPolling {
                interval: config.receipt_poll_interval(),
                attempts: config.receipt_poll_attempts,
            },
        )
    }

    /// Returns the node endpoint.
    #[must_use]
    pub fn rpc_url(&self) -> &str {
        self.client.endpoint()
    }

    /// Returns every JSON-RPC exchange made so far.
    #[must_use]
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.client.transcript()
    }

    /// Polls for the receipt of `hash` until it is mined or attempts run out.
    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TransactionReceipt, LedgerError> {
        let hash_text = hash.to_string();
        for attempt in 1 ..= self.polling.attempts {
            let receipt: Option<ReceiptWire> = self
                .client
                .request("eth_getTransactionReceipt", json!([hash_text]))
                .await
                .map_err(query_error)?;
            if let Some(receipt) = receipt
                && receipt.block_number.is_some()
            {
                return receipt.into_receipt();
            }
            if attempt < self.polling.attempts {
                sleep(self.polling.interval).await;
            }
        }
        Err(LedgerError::Connection(format!(
            "receipt for {hash_text} not available after {} polls",
            self.polling.attempts
        )))
    }
}

#[async_trait]
impl LedgerConnection for HttpLedgerConnection {
    async fn list_accounts(&self) -> Result<Vec<Account>, LedgerError> {
        let raw: Vec<String> =
            self.client.request("eth_accounts", json!([])).await.map_err(query_error)?;
        raw.iter().map(|account| Account::parse(account)).collect()
    }

    async fn deploy(
        &self,
        payload: &[u8],
        abi: &ContractAbi,
        sender: Account,
        gas: GasLimit,
    ) -> Result<DeployedContract, LedgerError> {
        let request = TransactionRequestWire::creation(sender, payload, gas);
        let hash: String = self
            .client
            .request("eth_sendTransaction", json!([request]))
            .await
            .map_err(deploy_error)?;
        let receipt = self.wait_for_receipt(TxHash::parse(&hash)?).await?;
        if !receipt.succeeded() {
            return Err(failed_creation(&receipt, gas));
        }
        let address = receipt.contract_address.ok_or_else(|| {
            LedgerError::Deployment(format!(
                "creation {} confirmed without a contract address",
                receipt.transaction_hash
            ))
        })?;
        Ok(DeployedContract {
            address,
            abi: abi.clone(),
            receipt,
        })
    }

    async fn send(
        &self,
        contract: ContractAddress,
        abi: &ContractAbi,
        method: &str,
        args: &[Token],
        sender: Account,
        gas: GasLimit,
    ) -> Result<TransactionReceipt, LedgerError> {
        let data = abi.encode_call(method, args)?;
        let request = TransactionRequestWire::invocation(sender, contract, &data, gas);
        let hash: String = self
            .client
            .request("eth_sendTransaction", json!([request]))
            .await
            .map_err(|err| send_error(method, err))?;
        let receipt = self.wait_for_receipt(TxHash::parse(&hash)?).await?;
        if !receipt.succeeded() {
            return Err(failed_invocation(method, &receipt, gas));
        }
        Ok(receipt)
    }

    async fn call(
        &self,
        contract: ContractAddress,
        abi: &ContractAbi,
        method: &str,
        args: &[Token],
    ) -> Result<ResultTuple, LedgerError> {
        let data = abi.encode_call(method, args)?;
        let request = CallRequestWire::new(contract, &data);
        let raw: String = self
            .client
            .request("eth_call", json!([request, "latest"]))
            .await
            .map_err(|err| call_error(method, err))?;
        let output = decode_hex(&raw).map_err(LedgerError::Protocol)?;
        abi.decode_output(method, &output)
    }

    async fn block_number(&self) -> Result<u64, LedgerError> {
        let raw: String =
            self.client.request("eth_blockNumber", json!([])).await.map_err(query_error)?;
        decode_quantity(&raw)
    }
}
