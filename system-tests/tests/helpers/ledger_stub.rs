// system-tests/tests/helpers/ledger_stub.rs
// ============================================================================
// Module: Ledger Stub
// Description: Minimal in-process JSON-RPC ledger node for system-tests.
// Purpose: Exercise the HTTP connection and harness without an external node.
// Dependencies: axum, ethers-core, tokio
// ============================================================================

//! ## Overview
//! The stub answers `eth_accounts`, `eth_blockNumber`, `eth_sendTransaction`,
//! `eth_getTransactionReceipt`, and `eth_call`. Every non-empty creation
//! payload deploys an enrollment contract at the address the sender's nonce
//! derives. The contract stores one `(name, age)` record per sender, overwrites
//! on re-enrollment, and rejects empty names so revert handling can be
//! exercised. Gas is charged at fixed costs; a limit below the cost runs out of
//! gas.

use std::collections::HashMap;
use std::net::TcpListener as StdTcpListener;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use ethers_core::abi::ParamType;
use ethers_core::abi::Token;
use ethers_core::types::Address;
use ethers_core::types::H256;
use ethers_core::types::U256;
use ethers_core::utils::get_contract_address;
use ethers_core::utils::id;
use ethers_core::utils::keccak256;
use ledger_harness_core::Account;
use ledger_harness_core::ContractAddress;
use ledger_harness_core::core::decode_hex;
use ledger_harness_core::core::encode_hex;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use tokio::runtime::Builder;
use tokio::sync::oneshot;
use tokio::time::sleep;

/// Node message for gas exhaustion, as reported by development nodes.
pub const OUT_OF_GAS_MESSAGE: &str = "VM Exception while processing transaction: out of gas";
/// Node message for a reverted execution.
pub const REVERT_MESSAGE: &str = "VM Exception while processing transaction: revert";
/// Gas limit applied when a transaction names none.
const DEFAULT_TX_GAS: u64 = 6_721_975;

// ============================================================================
// SECTION: Options
// ============================================================================

/// How the stub reports failed transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Reject `eth_sendTransaction` with a JSON-RPC error.
    RpcError,
    /// Accept the transaction and mine a receipt with status `0x0`.
    MinedReceipt,
}

/// Behavior knobs for a stub node.
#[derive(Debug, Clone)]
pub struct LedgerStubOptions {
    /// Number of node-controlled accounts.
    pub accounts: u64,
    /// Gas charged for a contract creation.
    pub deploy_gas: u64,
    /// Gas charged for an enrollment.
    pub enroll_gas: u64,
    /// How failures surface.
    pub failure_mode: FailureMode,
    /// Receipt polls answered with `null` before the receipt appears.
    pub receipt_delay_polls: u32,
    /// Delay applied to every response.
    pub response_delay: Duration,
}

impl Default for LedgerStubOptions {
    fn default() -> Self {
        Self {
            accounts: 10,
            deploy_gas: 250_000,
            enroll_gas: 90_000,
            failure_mode: FailureMode::RpcError,
            receipt_delay_polls: 0,
            response_delay: Duration::ZERO,
        }
    }
}

// ============================================================================
// SECTION: State
// ============================================================================

/// Receipt waiting to be observed.
struct PendingReceipt {
    receipt: Value,
    polls_remaining: u32,
}

/// Mutable chain state.
#[derive(Default)]
struct LedgerState {
    block: u64,
    tx_count: u64,
    nonces: HashMap<Address, u64>,
    contracts: HashMap<Address, HashMap<Address, (String, U256)>>,
    receipts: HashMap<H256, PendingReceipt>,
    deployments: usize,
    requests: Vec<String>,
}

#[derive(Clone)]
struct StubState {
    options: LedgerStubOptions,
    accounts: Arc<Vec<Address>>,
    ledger: Arc<Mutex<LedgerState>>,
}

type RpcResult = Result<Value, (i64, String)>;

// ============================================================================
// SECTION: Handle
// ============================================================================

/// Handle for the stub ledger node.
pub struct LedgerStubHandle {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<thread::JoinHandle<()>>,
    accounts: Arc<Vec<Address>>,
    ledger: Arc<Mutex<LedgerState>>,
}

impl LedgerStubHandle {
    /// Returns the node URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the node-controlled accounts in node order.
    pub fn accounts(&self) -> Vec<Account> {
        self.accounts.iter().copied().map(Account::new).collect()
    }

    /// Returns the number of successful contract creations.
    pub fn deployments(&self) -> usize {
        self.ledger.lock().map_or(0, |ledger| ledger.deployments)
    }

    /// Returns the JSON-RPC methods received, in order.
    pub fn requests(&self) -> Vec<String> {
        self.ledger.lock().map_or_else(|_| Vec::new(), |ledger| ledger.requests.clone())
    }

    /// Returns how many times `method` was requested.
    pub fn request_count(&self, method: &str) -> usize {
        self.requests().iter().filter(|seen| seen.as_str() == method).count()
    }

    /// Returns the stored record for `account` in `contract`, read directly from state.
    pub fn stored_record(
        &self,
        contract: ContractAddress,
        account: Account,
    ) -> Option<(String, String)> {
        let ledger = self.ledger.lock().ok()?;
        ledger
            .contracts
            .get(&contract.address())?
            .get(&account.address())
            .map(|(name, age)| (name.clone(), age.to_string()))
    }
}

impl Drop for LedgerStubHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// Spawn a stub node with default options.
pub async fn spawn_ledger_stub() -> Result<LedgerStubHandle, String> {
    spawn_ledger_stub_with(LedgerStubOptions::default()).await
}

/// Spawn a stub node with custom options.
#[allow(clippy::unused_async, reason = "Async signature keeps helper API consistent in tests.")]
pub async fn spawn_ledger_stub_with(
    options: LedgerStubOptions,
) -> Result<LedgerStubHandle, String> {
    let listener = StdTcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("ledger stub bind failed: {err}"))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("ledger stub listener nonblocking failed: {err}"))?;
    let addr =
        listener.local_addr().map_err(|err| format!("ledger stub local addr failed: {err}"))?;
    let base_url = format!("http://{addr}");

    let accounts: Arc<Vec<Address>> = Arc::new(
        (0 .. options.accounts)
            .map(|index| Address::from_slice(&keccak256(index.to_be_bytes())[12 ..]))
            .collect(),
    );
    let ledger = Arc::new(Mutex::new(LedgerState::default()));
    let state = StubState {
        options,
        accounts: Arc::clone(&accounts),
        ledger: Arc::clone(&ledger),
    };
    let app = Router::new().route("/", post(handle_rpc)).with_state(state);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = thread::spawn(move || {
        let Ok(runtime) = Builder::new_current_thread().enable_all().build() else {
            return;
        };
        runtime.block_on(async move {
            let Ok(listener) = tokio::net::TcpListener::from_std(listener) else {
                return;
            };
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = server.await;
        });
    });
    Ok(LedgerStubHandle {
        base_url,
        shutdown: Some(shutdown_tx),
        join: Some(join),
        accounts,
        ledger,
    })
}

// ============================================================================
// SECTION: JSON-RPC
// ============================================================================

#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    id: Value,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: &'static str,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct TransactionParams {
    from: String,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    gas: Option<String>,
    #[serde(default)]
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CallParams {
    to: String,
    #[serde(default)]
    data: Option<String>,
}

async fn handle_rpc(State(state): State<StubState>, bytes: Bytes) -> impl IntoResponse {
    let request: Result<JsonRpcRequest, _> = serde_json::from_slice(bytes.as_ref());
    if let Ok(request) = &request
        && let Ok(mut ledger) = state.ledger.lock()
    {
        ledger.requests.push(request.method.clone());
    }
    if state.options.response_delay > Duration::ZERO {
        sleep(state.options.response_delay).await;
    }
    let response = match request {
        Err(_) => failure(Value::Null, -32600, "invalid request".to_string()),
        Ok(request) if request.jsonrpc != "2.0" => {
            failure(request.id, -32600, "invalid json-rpc version".to_string())
        }
        Ok(request) => match dispatch(&state, &request.method, &request.params) {
            Ok(result) => JsonRpcResponse {
                jsonrpc: "2.0",
                id: request.id,
                result: Some(result),
                error: None,
            },
            Err((code, message)) => failure(request.id, code, message),
        },
    };
    axum::Json(response)
}

fn failure(id: Value, code: i64, message: String) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0",
        id,
        result: None,
        error: Some(JsonRpcError {
            code,
            message,
        }),
    }
}

fn dispatch(state: &StubState, method: &str, params: &Value) -> RpcResult {
    match method {
        "eth_accounts" => Ok(Value::Array(
            state.accounts.iter().map(|account| json!(encode_hex(account.as_bytes()))).collect(),
        )),
        "eth_blockNumber" => {
            let ledger = lock(state)?;
            Ok(json!(quantity(ledger.block)))
        }
        "eth_sendTransaction" => {
            let tx: TransactionParams = first_param(params)?;
            send_transaction(state, &tx)
        }
        "eth_getTransactionReceipt" => {
            let hash: String = first_param(params)?;
            let hash = parse_hash(&hash)?;
            let mut ledger = lock(state)?;
            Ok(match ledger.receipts.get_mut(&hash) {
                Some(pending) if pending.polls_remaining > 0 => {
                    pending.polls_remaining -= 1;
                    Value::Null
                }
                Some(pending) => pending.receipt.clone(),
                None => Value::Null,
            })
        }
        "eth_call" => {
            let call: CallParams = first_param(params)?;
            call_contract(state, &call)
        }
        _ => Err((-32601, format!("method {method} not found"))),
    }
}

// ============================================================================
// SECTION: Execution
// ============================================================================

fn send_transaction(state: &StubState, tx: &TransactionParams) -> RpcResult {
    let from = parse_address(&tx.from)?;
    if !state.accounts.contains(&from) {
        return Err((-32000, "sender account not recognized".to_string()));
    }
    let gas = tx.gas.as_deref().map_or(Ok(DEFAULT_TX_GAS), parse_quantity)?;
    let data = decode_hex(tx.data.as_deref().unwrap_or("0x")).map_err(invalid_params)?;
    let options = &state.options;
    let mut ledger = lock(state)?;

    let Some(to) = &tx.to else {
        if data.is_empty() {
            return Err((-32000, "contract creation without any data provided".to_string()));
        }
        if gas < options.deploy_gas {
            return fail(&mut ledger, options, from, gas, OUT_OF_GAS_MESSAGE);
        }
        let nonce = ledger.nonces.get(&from).copied().unwrap_or_default();
        let address = get_contract_address(from, nonce);
        ledger.contracts.insert(address, HashMap::new());
        ledger.deployments += 1;
        return Ok(mine(&mut ledger, options, from, Some(address), options.deploy_gas, true));
    };

    let to = parse_address(to)?;
    if !ledger.contracts.contains_key(&to) || data.len() < 4 {
        return fail(&mut ledger, options, from, gas, REVERT_MESSAGE);
    }
    if data[.. 4] != id("enrollStudent(string,uint256)") {
        return fail(&mut ledger, options, from, gas, REVERT_MESSAGE);
    }
    if gas < options.enroll_gas {
        return fail(&mut ledger, options, from, gas, OUT_OF_GAS_MESSAGE);
    }
    let decoded =
        ethers_core::abi::decode(&[ParamType::String, ParamType::Uint(256)], &data[4 ..]);
    let (name, age) = match decoded.as_deref() {
        Ok([Token::String(name), Token::Uint(age)]) if !name.is_empty() => (name.clone(), *age),
        _ => return fail(&mut ledger, options, from, gas, REVERT_MESSAGE),
    };
    if let Some(records) = ledger.contracts.get_mut(&to) {
        records.insert(from, (name, age));
    }
    Ok(mine(&mut ledger, options, from, None, options.enroll_gas, true))
}

fn call_contract(state: &StubState, call: &CallParams) -> RpcResult {
    let to = parse_address(&call.to)?;
    let data = decode_hex(call.data.as_deref().unwrap_or("0x")).map_err(invalid_params)?;
    let ledger = lock(state)?;
    let Some(records) = ledger.contracts.get(&to) else {
        return Ok(json!("0x"));
    };
    if data.len() < 4 {
        return Err((-32000, REVERT_MESSAGE.to_string()));
    }
    let selector = &data[.. 4];
    if selector == id("enrollStudent(string,uint256)") {
        return Ok(json!("0x"));
    }
    if selector != id("getEnrolledStudentByAddress(address)") {
        return Err((-32000, REVERT_MESSAGE.to_string()));
    }
    let decoded = ethers_core::abi::decode(&[ParamType::Address], &data[4 ..]);
    let Ok([Token::Address(student)]) = decoded.as_deref() else {
        return Err((-32000, REVERT_MESSAGE.to_string()));
    };
    let (name, age) = records.get(student).cloned().unwrap_or_default();
    let output = ethers_core::abi::encode(&[Token::String(name), Token::Uint(age)]);
    Ok(json!(encode_hex(&output)))
}

/// Reports a failed transaction according to the configured failure mode.
fn fail(
    ledger: &mut LedgerState,
    options: &LedgerStubOptions,
    from: Address,
    gas: u64,
    message: &str,
) -> RpcResult {
    match options.failure_mode {
        FailureMode::RpcError => Err((-32000, message.to_string())),
        FailureMode::MinedReceipt => {
            let gas_used = if message == OUT_OF_GAS_MESSAGE { gas } else { gas / 2 };
            Ok(mine(ledger, options, from, None, gas_used, false))
        }
    }
}

/// Includes a transaction in a new block and returns its hash.
fn mine(
    ledger: &mut LedgerState,
    options: &LedgerStubOptions,
    from: Address,
    contract: Option<Address>,
    gas_used: u64,
    success: bool,
) -> Value {
    ledger.tx_count += 1;
    ledger.block += 1;
    *ledger.nonces.entry(from).or_default() += 1;
    let mut preimage = ledger.tx_count.to_be_bytes().to_vec();
    preimage.extend_from_slice(from.as_bytes());
    let hash = H256::from(keccak256(preimage));
    let hash_text = encode_hex(hash.as_bytes());
    let receipt = json!({
        "transactionHash": hash_text,
        "blockNumber": quantity(ledger.block),
        "from": encode_hex(from.as_bytes()),
        "gasUsed": quantity(gas_used),
        "status": if success { "0x1" } else { "0x0" },
        "contractAddress": contract.map(|address| encode_hex(address.as_bytes())),
        "logs": [],
    });
    ledger.receipts.insert(
        hash,
        PendingReceipt {
            receipt,
            polls_remaining: options.receipt_delay_polls,
        },
    );
    json!(hash_text)
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

fn lock(state: &StubState) -> Result<std::sync::MutexGuard<'_, LedgerState>, (i64, String)> {
    state.ledger.lock().map_err(|_| (-32603, "ledger state poisoned".to_string()))
}

fn first_param<T: for<'de> Deserialize<'de>>(params: &Value) -> Result<T, (i64, String)> {
    let first = params.get(0).cloned().unwrap_or(Value::Null);
    serde_json::from_value(first).map_err(|err| invalid_params(err.to_string()))
}

fn invalid_params(message: String) -> (i64, String) {
    (-32602, format!("invalid params: {message}"))
}

fn parse_address(raw: &str) -> Result<Address, (i64, String)> {
    let bytes = decode_hex(raw).map_err(invalid_params)?;
    if bytes.len() != 20 {
        return Err(invalid_params(format!("address {raw} is not 20 bytes")));
    }
    Ok(Address::from_slice(&bytes))
}

fn parse_hash(raw: &str) -> Result<H256, (i64, String)> {
    let bytes = decode_hex(raw).map_err(invalid_params)?;
    if bytes.len() != 32 {
        return Err(invalid_params(format!("hash {raw} is not 32 bytes")));
    }
    Ok(H256::from_slice(&bytes))
}

fn parse_quantity(raw: &str) -> Result<u64, (i64, String)> {
    let digits = raw.trim_start_matches("0x");
    u64::from_str_radix(digits, 16).map_err(|err| invalid_params(format!("{raw}: {err}")))
}

fn quantity(value: u64) -> String {
    format!("0x{value:x}")
}
