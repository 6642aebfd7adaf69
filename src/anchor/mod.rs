// Copyright 2026 The Veracity Project
// SPDX-License-Identifier: Apache-2.0

// Anchoring — durable notarization of evidence fingerprints.
//
// The concrete ledger (EVM contract, consensus topic, anything else) sits
// behind the `LedgerClient` capability; the service only consumes typed
// results and picks fallbacks by pattern-matching the error. Records are
// keyed by evidence hash in a durable local registry that doubles as the
// simulation/offline cache.

pub mod registry;
pub mod rpc;
pub mod service;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// How a fingerprint was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnchorMode {
    /// Confirmed by the live ledger backend.
    OnChain,
    /// A live attempt failed; a well-formed fake reference was recorded
    /// locally instead.
    Simulated,
    /// No backend configured; recorded in the local registry with a
    /// deterministic pseudo-reference.
    LocalRegistry,
    /// Anchoring explicitly switched off by the operator.
    Offline,
}

impl AnchorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnchorMode::OnChain => "ON_CHAIN",
            AnchorMode::Simulated => "SIMULATED",
            AnchorMode::LocalRegistry => "LOCAL_REGISTRY",
            AnchorMode::Offline => "OFFLINE",
        }
    }
}

impl std::fmt::Display for AnchorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One anchoring record for one evidence hash. At most one authoritative
/// record per hash per registry; re-anchoring overwrites (last write
/// wins) and is the caller's decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorRecord {
    pub mode: AnchorMode,
    /// Ledger transaction id, consensus reference, or pseudo-reference
    /// depending on mode.
    pub reference: String,
    pub network: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub explorer_url: Option<String>,
    pub category: String,
    /// Unix seconds at record creation.
    pub timestamp: i64,
    /// Fallback context (e.g. why a live submission was simulated).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub note: Option<String>,
}

// ---------------------------------------------------------------------------
// Ledger capability
// ---------------------------------------------------------------------------

/// Typed failures from the ledger backend. The anchoring service matches
/// on these to pick its fallback; none of them ever reach a caller.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("insufficient operator balance: {0}")]
    InsufficientFunds(String),

    #[error("ledger transport failure: {0}")]
    Transport(String),

    #[error("ledger rejected the submission: {0}")]
    Rejected(String),

    #[error("ledger call timed out after {0} ms")]
    Timeout(u64),

    #[error("ledger payload could not be serialized: {0}")]
    Serialization(String),
}

/// Successful submission receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerReceipt {
    pub reference: String,
    /// Consensus/block timestamp if the backend reports one.
    pub consensus_timestamp: Option<i64>,
}

/// An existing entry found by a ledger lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub reference: String,
    pub category: Option<String>,
    pub timestamp: Option<i64>,
}

/// Capability interface over the notarization backend.
///
/// Implementations are injected at startup; the service holds `None` when
/// no backend is configured and stays in the disabled state for the
/// process lifetime.
#[async_trait::async_trait]
pub trait LedgerClient: Send + Sync {
    /// Human-readable network label (e.g. "testnet") for records.
    fn network(&self) -> &str;

    /// Check the operator can afford a submission.
    async fn capacity(&self) -> Result<(), LedgerError>;

    /// Submit a fingerprint; returns the durable reference.
    async fn submit(&self, evidence_hash: &str, category: &str)
        -> Result<LedgerReceipt, LedgerError>;

    /// Look up a previously anchored fingerprint.
    async fn lookup(&self, evidence_hash: &str) -> Result<Option<LedgerEntry>, LedgerError>;

    /// Public explorer URL for a reference, if the network has one.
    fn explorer_url(&self, reference: &str) -> Option<String>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
