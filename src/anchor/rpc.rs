// Copyright 2026 The Veracity Project
// SPDX-License-Identifier: Apache-2.0

// HTTP notary-gateway ledger adapter.
//
// Speaks a neutral gateway contract — capacity probe, submission, lookup
// — so that whichever concrete ledger sits behind the gateway (EVM
// contract, consensus topic) never leaks into the service. Signing,
// nonces and consensus are the gateway's problem. Call deadlines are
// enforced by the anchoring service, not here.

use serde::{Deserialize, Serialize};

use super::{LedgerClient, LedgerEntry, LedgerError, LedgerReceipt};

pub struct RpcLedgerClient {
    http: reqwest::Client,
    base_url: String,
    credential: String,
    topic: String,
    network: String,
    explorer_base: Option<String>,
}

impl RpcLedgerClient {
    pub fn new(
        rpc_url: impl Into<String>,
        credential: impl Into<String>,
        topic: impl Into<String>,
        network: impl Into<String>,
        explorer_base: Option<String>,
    ) -> Self {
        let mut base_url = rpc_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
            credential: credential.into(),
            topic: topic.into(),
            network: network.into(),
            explorer_base: explorer_base.map(|b| b.trim_end_matches('/').to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct OperatorStatus {
    funded: bool,
    #[serde(default)]
    balance: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnchorSubmission<'a> {
    evidence_hash: &'a str,
    category: &'a str,
    topic: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnchorReceiptBody {
    transaction_id: String,
    #[serde(default)]
    consensus_timestamp: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnchorEntryBody {
    transaction_id: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    timestamp: Option<i64>,
}

// ---------------------------------------------------------------------------
// LedgerClient implementation
// ---------------------------------------------------------------------------

#[async_trait::async_trait]
impl LedgerClient for RpcLedgerClient {
    fn network(&self) -> &str {
        &self.network
    }

    async fn capacity(&self) -> Result<(), LedgerError> {
        let response = self
            .http
            .get(format!("{}/operator", self.base_url))
            .bearer_auth(&self.credential)
            .send()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LedgerError::Rejected(format!(
                "operator probe returned {}",
                response.status()
            )));
        }

        let status: OperatorStatus = response
            .json()
            .await
            .map_err(|e| LedgerError::Serialization(e.to_string()))?;

        if status.funded {
            Ok(())
        } else {
            Err(LedgerError::InsufficientFunds(
                status
                    .balance
                    .unwrap_or_else(|| "balance unavailable".to_string()),
            ))
        }
    }

    async fn submit(
        &self,
        evidence_hash: &str,
        category: &str,
    ) -> Result<LedgerReceipt, LedgerError> {
        let response = self
            .http
            .post(format!("{}/anchors", self.base_url))
            .bearer_auth(&self.credential)
            .json(&AnchorSubmission {
                evidence_hash,
                category,
                topic: &self.topic,
            })
            .send()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let body: AnchorReceiptBody = response
                .json()
                .await
                .map_err(|e| LedgerError::Serialization(e.to_string()))?;
            Ok(LedgerReceipt {
                reference: body.transaction_id,
                consensus_timestamp: body.consensus_timestamp,
            })
        } else if status == reqwest::StatusCode::PAYMENT_REQUIRED {
            Err(LedgerError::InsufficientFunds(
                "gateway refused: payment required".to_string(),
            ))
        } else {
            let detail = response.text().await.unwrap_or_default();
            Err(LedgerError::Rejected(format!("{status}: {detail}")))
        }
    }

    async fn lookup(&self, evidence_hash: &str) -> Result<Option<LedgerEntry>, LedgerError> {
        let response = self
            .http
            .get(format!("{}/anchors/{evidence_hash}", self.base_url))
            .bearer_auth(&self.credential)
            .send()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            Ok(None)
        } else if status.is_success() {
            let body: AnchorEntryBody = response
                .json()
                .await
                .map_err(|e| LedgerError::Serialization(e.to_string()))?;
            Ok(Some(LedgerEntry {
                reference: body.transaction_id,
                category: body.category,
                timestamp: body.timestamp,
            }))
        } else {
            Err(LedgerError::Rejected(format!("lookup returned {status}")))
        }
    }

    fn explorer_url(&self, reference: &str) -> Option<String> {
        self.explorer_base
            .as_ref()
            .map(|base| format!("{base}/tx/{reference}"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
