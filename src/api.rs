// Copyright 2026 The Veracity Project
// SPDX-License-Identifier: Apache-2.0

// HTTP surface — scan, verify and a liveness probe.
//
// Responsibilities:
// - Request validation at the boundary (InputError → 4xx)
// - Verdict bundle shaping, including the anchor block
// - Heartbeat endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::anchor::service::VerifyOutcome;
use crate::anchor::{AnchorMode, AnchorRecord};
use crate::engine::ScanEngine;
use crate::fusion::Verdict;
use crate::media::{InputError, ScanRequest};

// ---------------------------------------------------------------------------
// State and router
// ---------------------------------------------------------------------------

pub struct AppState {
    pub engine: ScanEngine,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/scan", post(scan))
        .route("/api/verify", post(verify))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ScanBody {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    #[serde(flatten)]
    pub verdict: Verdict,
    pub evidence_hash: String,
    pub anchor: AnchorBlock,
}

/// The anchoring section of a scan response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorBlock {
    pub network: String,
    /// confirmed (on chain), failed (live attempt fell back to a
    /// simulated record) or offline (no backend involved).
    pub status: &'static str,
    pub mode: AnchorMode,
    pub transaction_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnchorBlock {
    fn from_record(record: &AnchorRecord) -> Self {
        let status = match record.mode {
            AnchorMode::OnChain => "confirmed",
            AnchorMode::Simulated => "failed",
            AnchorMode::LocalRegistry | AnchorMode::Offline => "offline",
        };
        Self {
            network: record.network.clone(),
            status,
            mode: record.mode,
            transaction_id: record.reference.clone(),
            explorer_url: record.explorer_url.clone(),
            error: record.note.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyBody {
    pub evidence_hash: String,
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

impl IntoResponse for InputError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            InputError::OversizedMedia { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn scan(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ScanBody>,
) -> Result<Json<ScanResponse>, InputError> {
    let request = ScanRequest::from_parts(&body.kind, body.content, body.label)?;
    let outcome = state.engine.scan(request).await?;

    Ok(Json(ScanResponse {
        anchor: AnchorBlock::from_record(&outcome.anchor),
        verdict: outcome.verdict,
        evidence_hash: outcome.evidence_hash,
    }))
}

async fn verify(
    State(state): State<Arc<AppState>>,
    Json(body): Json<VerifyBody>,
) -> Json<serde_json::Value> {
    let outcome = state.engine.verify(&body.evidence_hash).await;
    let payload = match outcome {
        VerifyOutcome::Anchored(record) => serde_json::json!({
            "status": "verified",
            "anchor": record,
        }),
        VerifyOutcome::NotFound {
            backend_checked,
            detail,
        } => serde_json::json!({
            "status": "failed",
            "anchor": {
                "found": false,
                "backendChecked": backend_checked,
                "detail": detail,
            },
        }),
    };
    Json(payload)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}
