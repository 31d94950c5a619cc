// crates/ledger-harness-core/src/runtime/readiness.rs
// ============================================================================
// Module: Readiness Helpers
// Description: Readiness probe for ledger nodes.
// Purpose: Wait for a node to answer without arbitrary sleeps.
// Dependencies: tokio
// ============================================================================

//! ## Overview
//! [`wait_for_node_ready`] is an opt-in probe for callers that start a node
//! alongside their tests. It runs before setup and swallows probe errors only
//! until its deadline. [`TestHarness`](crate::TestHarness) never calls it, so
//! node failures during a run always surface on first occurrence.
//! Invariants:
//! - Only `block_number` is sent; nothing is submitted to the node.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;
use std::time::Instant;

use tokio::time::sleep;

use crate::core::LedgerError;
use crate::interfaces::LedgerConnection;

// ============================================================================
// SECTION: Readiness
// ============================================================================

/// Delay between readiness probes.
const PROBE_INTERVAL: Duration = Duration::from_millis(50);

/// Polls the block number until the node responds or `timeout` expires.
///
/// # Errors
///
/// Returns [`LedgerError::Connection`] carrying the last probe error when the
/// node never answered in time.
pub async fn wait_for_node_ready(
    connection: &dyn LedgerConnection,
    timeout: Duration,
) -> Result<u64, LedgerError> {
    let start = Instant::now();
    let mut attempts = 0u32;
    loop {
        attempts = attempts.saturating_add(1);
        match connection.block_number().await {
            Ok(block) => return Ok(block),
            Err(err) => {
                if start.elapsed() > timeout {
                    return Err(LedgerError::Connection(format!(
                        "node readiness timeout after {attempts} attempts: {err}"
                    )));
                }
                sleep(PROBE_INTERVAL).await;
            }
        }
    }
}
