// Copyright 2026 The Veracity Project
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;
use veracity::anchor::registry::EvidenceRegistry;
use veracity::anchor::rpc::RpcLedgerClient;
use veracity::anchor::service::{AnchorPolicy, AnchoringService};
use veracity::anchor::LedgerClient;
use veracity::api;
use veracity::config::{self, Config, LedgerMode};
use veracity::engine::{EngineDeps, ScanEngine};
use veracity::signal::extractor::{
    NeutralAudioExtractor, NeutralImageExtractor, NeutralTextExtractor, NeutralVideoExtractor,
};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "veracity-engine", about = "Media authenticity scanner")]
struct Cli {
    /// Path to the veracity.yaml config file
    #[arg(long, default_value = "veracity.yaml", env = "VERACITY_CONFIG")]
    config: String,

    /// Port to listen on
    #[arg(long, default_value_t = 9820, env = "VERACITY_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .json()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let addr = SocketAddr::from(([127, 0, 0, 1], cli.port));
    tracing::info!(%addr, "veracity starting");

    let config = if std::path::Path::new(&cli.config).exists() {
        let source = config::FileSource {
            path: std::path::PathBuf::from(&cli.config),
        };
        match config::load_config(&source) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!("failed to load config: {e}");
                std::process::exit(1);
            }
        }
    } else {
        tracing::warn!(path = %cli.config, "config file not found, using defaults (anchoring disabled)");
        Config::default()
    };

    tracing::info!(
        environment = %config.environment,
        ledger_configured = config.ledger.is_configured(),
        registry = %config.storage.registry_path.display(),
        "config loaded"
    );

    let registry = Arc::new(EvidenceRegistry::open(&config.storage.registry_path));

    let ledger: Option<Arc<dyn LedgerClient>> = match (
        &config.ledger.rpc_url,
        &config.ledger.credential,
        &config.ledger.topic,
    ) {
        (Some(rpc_url), Some(credential), Some(topic)) => {
            tracing::info!(network = %config.ledger.network, "ledger client configured");
            Some(Arc::new(RpcLedgerClient::new(
                rpc_url.clone(),
                credential.clone(),
                topic.clone(),
                config.ledger.network.clone(),
                config.ledger.explorer_base.clone(),
            )))
        }
        _ => {
            tracing::warn!("ledger credentials missing, anchoring runs in local-registry mode");
            None
        }
    };

    let policy = match config.ledger.mode {
        LedgerMode::Auto => AnchorPolicy::Auto,
        LedgerMode::Off => AnchorPolicy::Off,
    };

    let anchoring = Arc::new(AnchoringService::new(
        ledger,
        registry,
        policy,
        Duration::from_millis(config.ledger.timeout_ms),
    ));

    let deps = EngineDeps {
        text: Arc::new(NeutralTextExtractor),
        image: Arc::new(NeutralImageExtractor),
        audio: Arc::new(NeutralAudioExtractor),
        video: Arc::new(NeutralVideoExtractor),
        anchoring,
        max_media_bytes: config.engine.max_media_bytes,
    };

    let state = Arc::new(api::AppState {
        engine: ScanEngine::new(deps),
    });

    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind to address");

    tracing::info!(%addr, "veracity listening");

    axum::serve(listener, app).await.expect("server error");
}
