//! Papergrader HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use papergrader::config::Config;
use papergrader::embedding::{Embedder, LazyEmbedder};
use papergrader::gateway::{HandlerState, create_router_with_state};
use papergrader::grading::GradingPipeline;
use papergrader::ocr::{OcrConfig, VisionExtractor};
use papergrader::storage::MemoryStore;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        "Papergrader starting"
    );

    if config.model_path.is_none() {
        tracing::warn!("No PAPERGRADER_MODEL_PATH configured, running embedder in stub mode");
    }
    let embedder = Arc::new(LazyEmbedder::new(config.sentence_config()));

    if config.preload_model {
        let loader = Arc::clone(&embedder);
        tokio::task::spawn_blocking(move || loader.preload()).await??;
    } else {
        tracing::info!("Model preload disabled, loading on first request");
    }

    let extractor = Arc::new(VisionExtractor::new(OcrConfig::from_env()?)?);

    tracing::info!(
        model = embedder.model_id(),
        embedding_dim = embedder.embedding_dim(),
        stub = embedder.is_stub(),
        "Grading pipeline ready"
    );

    let pipeline = GradingPipeline::new(embedder, extractor);
    let store = Arc::new(MemoryStore::new());
    let state = HandlerState::new(pipeline, store).with_upload_limit(config.max_upload_bytes);

    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Papergrader shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("PAPERGRADER_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(rt) = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    else {
        return 1;
    };

    rt.block_on(async {
        let Ok(client) = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
        else {
            return 1;
        };

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
