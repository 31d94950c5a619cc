// crates/ledger-harness-rpc/src/client.rs
// ============================================================================
// Module: JSON-RPC HTTP Client
// Description: JSON-RPC 2.0 client for ledger nodes with transcript capture.
// Purpose: Issue single-shot requests and keep every exchange for artifacts.
// Dependencies: reqwest, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`JsonRpcClient`] posts one JSON-RPC request per call and decodes the
//! `result` member into the caller's type. Failures are split into transport,
//! node, and protocol errors so the connection layer can classify them.
//! Invariants:
//! - Requests are never retried; the first failure is returned.
//! - Every exchange that produced a JSON body is appended to the transcript.
//! - The transcript keeps the newest [`MAX_TRANSCRIPT_ENTRIES`] exchanges;
//!   sequence numbers keep counting past evicted entries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Exchanges retained in a client transcript.
pub const MAX_TRANSCRIPT_ENTRIES: usize = 4096;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure of a single JSON-RPC exchange.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RpcError {
    /// The request never produced a JSON-RPC response.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The node answered with a JSON-RPC error object.
    #[error("node error {code}: {message}")]
    Node {
        /// JSON-RPC error code.
        code: i64,
        /// Node-provided message.
        message: String,
        /// Optional structured detail.
        data: Option<Value>,
    },
    /// The response did not follow JSON-RPC 2.0 or the expected shape.
    #[error("protocol violation: {0}")]
    Protocol(String),
}

// ============================================================================
// SECTION: Wire Envelope
// ============================================================================

/// One recorded request/response exchange.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntry {
    /// 1-based position among all exchanges made by the client.
    pub sequence: u64,
    /// JSON-RPC method name.
    pub method: String,
    /// Request envelope as sent.
    pub request: Value,
    /// Response envelope as received.
    pub response: Value,
    /// Node error message, if any.
    pub error: Option<String>,
}

/// Outgoing request envelope.
#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    /// Protocol version marker.
    jsonrpc: &'static str,
    /// Request id echoed by the node.
    id: u64,
    /// Method name.
    method: &'a str,
    /// Positional parameters.
    params: Value,
}

/// Incoming response envelope; a `null` result stays distinguishable from an error.
#[derive(Debug, Deserialize, Serialize)]
struct JsonRpcResponse {
    /// Echoed request id.
    #[serde(default)]
    id: Option<Value>,
    /// Result member, `Null` when absent.
    #[serde(default)]
    result: Value,
    /// Error member.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcErrorObject>,
}

/// JSON-RPC error object.
#[derive(Debug, Deserialize, Serialize)]
struct JsonRpcErrorObject {
    /// Error code.
    code: i64,
    /// Error message.
    message: String,
    /// Optional structured detail.
    #[serde(default)]
    data: Option<Value>,
}

/// Bounded exchange log shared by clones of one client.
#[derive(Debug, Default)]
struct Transcript {
    /// Retained exchanges, oldest first.
    entries: VecDeque<TranscriptEntry>,
    /// Exchanges recorded so far, including evicted ones.
    recorded: u64,
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// JSON-RPC HTTP client with transcript capture.
#[derive(Debug, Clone)]
pub struct JsonRpcClient {
    /// Endpoint receiving every POST.
    endpoint: String,
    /// Shared HTTP client with the request timeout applied.
    client: Client,
    /// Next request id.
    next_id: Arc<AtomicU64>,
    /// Recorded exchanges.
    transcript: Arc<Mutex<Transcript>>,
}

impl JsonRpcClient {
    /// Creates a client for `endpoint` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Transport`] when the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, RpcError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| RpcError::Transport(format!("failed to build http client: {err}")))?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
            next_id: Arc::new(AtomicU64::new(1)),
            transcript: Arc::new(Mutex::new(Transcript::default())),
        })
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns a snapshot of the retained transcript entries, oldest first.
    #[must_use]
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.transcript
            .lock()
            .map_or_else(|_| Vec::new(), |log| log.entries.iter().cloned().collect())
    }

    /// Issues `method` with `params` and decodes the result.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Transport`] when the node cannot be reached,
    /// [`RpcError::Node`] when it answers with an error object, and
    /// [`RpcError::Protocol`] when the response is malformed.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };
        let request_value = serde_json::to_value(&request)
            .map_err(|err| RpcError::Protocol(format!("jsonrpc serialization failed: {err}")))?;

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request_value)
            .send()
            .await
            .map_err(|err| RpcError::Transport(format!("{method} request failed: {err}")))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| RpcError::Transport(format!("{method} response body: {err}")))?;
        let payload: JsonRpcResponse = match serde_json::from_slice(&body) {
            Ok(payload) => payload,
            Err(_) if !status.is_success() => {
                return Err(RpcError::Transport(format!("http status {status} for {method}")));
            }
            Err(err) => {
                return Err(RpcError::Protocol(format!("invalid json-rpc response: {err}")));
            }
        };

        let error_message = payload.error.as_ref().map(|err| err.message.clone());
        self.record_transcript(
            method,
            request_value,
            serde_json::to_value(&payload).unwrap_or(Value::Null),
            error_message,
        );

        if let Some(error) = payload.error {
            return Err(RpcError::Node {
                code: error.code,
                message: error.message,
                data: error.data,
            });
        }
        if !status.is_success() {
            return Err(RpcError::Transport(format!("http status {status} for {method}")));
        }
        if payload.id.as_ref().and_then(Value::as_u64) != Some(id) {
            let echoed = payload.id.unwrap_or(Value::Null);
            return Err(RpcError::Protocol(format!(
                "{method} response id {echoed} does not match request id {id}"
            )));
        }
        serde_json::from_value(payload.result)
            .map_err(|err| RpcError::Protocol(format!("invalid {method} result: {err}")))
    }

    /// Appends one exchange to the transcript, evicting the oldest when full.
    pub(crate) fn record_transcript(
        &self,
        method: &str,
        request: Value,
        response: Value,
        error: Option<String>,
    ) {
        let Ok(mut guard) = self.transcript.lock() else {
            return;
        };
        guard.recorded = guard.recorded.saturating_add(1);
        if guard.entries.len() >= MAX_TRANSCRIPT_ENTRIES {
            guard.entries.pop_front();
        }
        let sequence = guard.recorded;
        guard.entries.push_back(TranscriptEntry {
            sequence,
            method: method.to_string(),
            request,
            response,
            error,
        });
    }
}
