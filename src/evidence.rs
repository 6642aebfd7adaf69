// Copyright 2026 The Veracity Project
// SPDX-License-Identifier: Apache-2.0

// Evidence hasher — canonical fingerprint of the forensically
// load-bearing verdict fields.
//
// Only category, riskScore, confidence and the first three explanation
// lines are hashed: two verdicts that agree on those fields produce the
// same fingerprint even when model metadata or the explanation tail
// differ. Keys are serialized in sorted order with no insignificant
// whitespace so the digest is stable across processes.

use std::collections::BTreeMap;

use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::fusion::Verdict;

/// How many explanation lines participate in the fingerprint.
pub const HASHED_EXPLANATION_LINES: usize = 3;

/// Canonical JSON payload for the fingerprint: exactly the keys
/// `category`, `confidence`, `explanation` (first three lines) and
/// `riskScore`, sorted, compact.
pub fn canonical_payload(verdict: &Verdict) -> String {
    let explanation: Vec<&String> = verdict
        .explanation
        .iter()
        .take(HASHED_EXPLANATION_LINES)
        .collect();

    // BTreeMap iterates in key order regardless of serializer features.
    let mut core: BTreeMap<&'static str, Value> = BTreeMap::new();
    core.insert("category", json!(verdict.category));
    core.insert("riskScore", json!(verdict.risk_score));
    core.insert("confidence", json!(verdict.confidence));
    core.insert("explanation", json!(explanation));

    serde_json::to_string(&core).expect("canonical payload is plain JSON data")
}

/// SHA-256 of the canonical payload, lowercase hex.
pub fn evidence_hash(verdict: &Verdict) -> String {
    hex::encode(Sha256::digest(canonical_payload(verdict).as_bytes()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
