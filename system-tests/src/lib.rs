// system-tests/src/lib.rs
// ============================================================================
// Module: Ledger Harness System Tests Library
// Description: Shared configuration for system test scenarios.
// Purpose: Provide common settings for the ledger harness system-test binaries.
// Dependencies: ledger-harness-core
// ============================================================================

//! ## Overview
//! This crate hosts the environment-driven configuration used by the
//! system-test binaries in `system-tests/tests`. The binaries run the harness
//! against an in-process stub node by default and against a live node when the
//! `live-node` feature is enabled.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
