// Integration tests — end-to-end scans through the HTTP surface:
// request → validation → extraction → fusion → fingerprint → anchor →
// response bundle.
//
// Uses wiremock as the notary gateway, tower::ServiceExt::oneshot for
// in-process HTTP, and real engine deps (scripted extractors only).

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use veracity::anchor::registry::EvidenceRegistry;
use veracity::anchor::rpc::RpcLedgerClient;
use veracity::anchor::service::{AnchorPolicy, AnchoringService};
use veracity::anchor::LedgerClient;
use veracity::api::{self, AppState};
use veracity::engine::{EngineDeps, ScanEngine};
use veracity::signal::extractor::{
    ExtractionError, NeutralAudioExtractor, NeutralImageExtractor, NeutralVideoExtractor,
    TextSignalExtractor,
};
use veracity::signal::TextSignals;

// ---------------------------------------------------------------------------
// Infrastructure
// ---------------------------------------------------------------------------

/// Text extractor scripted with fixed sub-scores.
struct ScriptedText {
    spam: f64,
    toxic: f64,
}

impl TextSignalExtractor for ScriptedText {
    fn extract(&self, _text: &str) -> Result<TextSignals, ExtractionError> {
        Ok(TextSignals::new(self.spam, self.toxic))
    }
}

fn app(anchoring: AnchoringService, spam: f64, toxic: f64) -> axum::Router {
    let deps = EngineDeps {
        text: Arc::new(ScriptedText { spam, toxic }),
        image: Arc::new(NeutralImageExtractor),
        audio: Arc::new(NeutralAudioExtractor),
        video: Arc::new(NeutralVideoExtractor),
        anchoring: Arc::new(anchoring),
        max_media_bytes: 1024 * 1024,
    };
    api::router(Arc::new(AppState {
        engine: ScanEngine::new(deps),
    }))
}

fn disabled_app(spam: f64, toxic: f64) -> axum::Router {
    app(
        AnchoringService::disabled(Arc::new(EvidenceRegistry::in_memory())),
        spam,
        toxic,
    )
}

fn gateway_client(server: &MockServer) -> Arc<dyn LedgerClient> {
    Arc::new(RpcLedgerClient::new(
        server.uri(),
        "test-credential",
        "0.0.4811920",
        "testnet",
        Some("https://explorer.test".to_string()),
    ))
}

fn gateway_app(server: &MockServer, spam: f64) -> axum::Router {
    let service = AnchoringService::new(
        Some(gateway_client(server)),
        Arc::new(EvidenceRegistry::in_memory()),
        AnchorPolicy::Auto,
        Duration::from_millis(2_000),
    );
    app(service, spam, 0.0)
}

async fn post_json(router: &axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn scan_body(kind: &str, content: &str) -> Value {
    json!({ "type": kind, "content": content, "label": "integration" })
}

fn is_hex64(s: &str) -> bool {
    s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit())
}

// ---------------------------------------------------------------------------
// Disabled-backend paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn text_scam_scan_returns_full_bundle_offline() {
    let router = disabled_app(0.7, 0.2);
    let (status, body) = post_json(&router, "/api/scan", scan_body("text", "wire the money")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "SCAM");
    // 0.7 + 0.25*0.2 = 0.75
    assert_eq!(body["riskScore"], 75);
    assert!(is_hex64(body["evidenceHash"].as_str().unwrap()));
    assert_eq!(body["anchor"]["status"], "offline");
    assert_eq!(body["anchor"]["mode"], "LOCAL_REGISTRY");
    assert_eq!(body["userSummary"]["verdict"], "SCAM DETECTED");
}

#[tokio::test]
async fn scan_then_verify_round_trip() {
    let router = disabled_app(0.8, 0.0);
    let (_, scanned) = post_json(&router, "/api/scan", scan_body("text", "hand it over")).await;
    let hash = scanned["evidenceHash"].as_str().unwrap().to_string();

    let (status, verified) =
        post_json(&router, "/api/verify", json!({ "evidenceHash": hash })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(verified["status"], "verified");
    assert_eq!(verified["anchor"]["mode"], "LOCAL_REGISTRY");
    assert_eq!(
        verified["anchor"]["reference"],
        scanned["anchor"]["transactionId"]
    );
}

#[tokio::test]
async fn verify_unknown_hash_reports_not_found() {
    let router = disabled_app(0.0, 0.0);
    let (status, body) = post_json(
        &router,
        "/api/verify",
        json!({ "evidenceHash": "ab".repeat(32) }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "failed");
    assert_eq!(body["anchor"]["found"], false);
    assert_eq!(body["anchor"]["backendChecked"], false);
}

#[tokio::test]
async fn empty_content_is_rejected() {
    let router = disabled_app(0.0, 0.0);
    let (status, body) = post_json(&router, "/api/scan", scan_body("text", "   ")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn unsupported_type_is_rejected() {
    let router = disabled_app(0.0, 0.0);
    let (status, body) = post_json(&router, "/api/scan", scan_body("hologram", "hi")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("hologram"));
}

#[tokio::test]
async fn invalid_base64_is_rejected() {
    let router = disabled_app(0.0, 0.0);
    let (status, _) = post_json(&router, "/api/scan", scan_body("image", "!!nope!!")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_endpoint_answers() {
    let router = disabled_app(0.0, 0.0);
    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Live-gateway paths (wiremock)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn healthy_gateway_confirms_anchor_on_chain() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/operator"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "funded": true })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/anchors"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "transactionId": "0xdeadbeef",
            "consensusTimestamp": 1_700_000_000,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let router = gateway_app(&server, 0.9);
    let (status, body) = post_json(&router, "/api/scan", scan_body("text", "send crypto")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["anchor"]["status"], "confirmed");
    assert_eq!(body["anchor"]["mode"], "ON_CHAIN");
    assert_eq!(body["anchor"]["transactionId"], "0xdeadbeef");
    assert_eq!(
        body["anchor"]["explorerUrl"],
        "https://explorer.test/tx/0xdeadbeef"
    );
}

#[tokio::test]
async fn rejected_submission_degrades_to_simulated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/operator"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "funded": true })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/anchors"))
        .respond_with(ResponseTemplate::new(500).set_body_string("execution reverted"))
        .mount(&server)
        .await;

    let router = gateway_app(&server, 0.9);
    let (status, body) = post_json(&router, "/api/scan", scan_body("text", "send crypto")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["anchor"]["status"], "failed");
    assert_eq!(body["anchor"]["mode"], "SIMULATED");
    assert!(is_hex64(body["anchor"]["transactionId"].as_str().unwrap()));
    assert!(body["anchor"]["error"]
        .as_str()
        .unwrap()
        .contains("live submission failed"));
}

#[tokio::test]
async fn underfunded_operator_never_submits() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/operator"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "funded": false, "balance": "0 wei" })),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/anchors"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let router = gateway_app(&server, 0.9);
    let (_, body) = post_json(&router, "/api/scan", scan_body("text", "send crypto")).await;

    assert_eq!(body["anchor"]["mode"], "SIMULATED");
    assert!(body["anchor"]["error"].as_str().unwrap().contains("balance"));
}

#[tokio::test]
async fn payment_required_submission_degrades_to_simulated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/operator"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "funded": true })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/anchors"))
        .respond_with(ResponseTemplate::new(402))
        .mount(&server)
        .await;

    let router = gateway_app(&server, 0.9);
    let (_, body) = post_json(&router, "/api/scan", scan_body("text", "send crypto")).await;

    assert_eq!(body["anchor"]["mode"], "SIMULATED");
    assert!(body["anchor"]["error"]
        .as_str()
        .unwrap()
        .contains("payment required"));
}

#[tokio::test]
async fn unreachable_gateway_still_returns_a_record() {
    let server = MockServer::start().await;
    let uri = server.uri();
    // Gateway goes away before the scan.
    drop(server);

    let client: Arc<dyn LedgerClient> = Arc::new(RpcLedgerClient::new(
        uri,
        "k",
        "t",
        "testnet",
        None,
    ));
    let service = AnchoringService::new(
        Some(client),
        Arc::new(EvidenceRegistry::in_memory()),
        AnchorPolicy::Auto,
        Duration::from_millis(2_000),
    );
    let router = app(service, 0.9, 0.0);

    let (status, body) = post_json(&router, "/api/scan", scan_body("text", "send crypto")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["anchor"]["mode"], "SIMULATED");
}

#[tokio::test]
async fn verify_consults_gateway_on_local_miss() {
    let server = MockServer::start().await;
    let hash = "cd".repeat(32);

    Mock::given(method("GET"))
        .and(path_regex(r"^/anchors/[0-9a-f]{64}$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transactionId": "0xabc123",
            "category": "DEEPFAKE",
            "timestamp": 1_699_000_000,
        })))
        .mount(&server)
        .await;

    let router = gateway_app(&server, 0.0);
    let (status, body) = post_json(&router, "/api/verify", json!({ "evidenceHash": hash })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "verified");
    assert_eq!(body["anchor"]["mode"], "ON_CHAIN");
    assert_eq!(body["anchor"]["reference"], "0xabc123");
    assert_eq!(body["anchor"]["category"], "DEEPFAKE");
}

#[tokio::test]
async fn verify_missing_on_gateway_reports_backend_checked() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/anchors/.*$"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let router = gateway_app(&server, 0.0);
    let (_, body) = post_json(
        &router,
        "/api/verify",
        json!({ "evidenceHash": "ef".repeat(32) }),
    )
    .await;

    assert_eq!(body["status"], "failed");
    assert_eq!(body["anchor"]["found"], false);
    assert_eq!(body["anchor"]["backendChecked"], true);
}
