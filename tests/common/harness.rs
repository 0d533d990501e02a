//! Test server harness.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use papergrader::embedding::{LazyEmbedder, SentenceConfig};
use papergrader::gateway::{HandlerState, create_router_with_state};
use papergrader::grading::GradingPipeline;
use papergrader::ocr::TextExtractor;
use papergrader::storage::MemoryStore;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;

#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub port: u16,
    pub preload_model: bool,
    pub max_upload_bytes: Option<usize>,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            port: 0,
            preload_model: true,
            max_upload_bytes: None,
        }
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub store: Arc<MemoryStore>,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn find_available_port() -> std::io::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    Ok(addr.port())
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Server startup failed: {0}")]
    StartupFailed(String),
}

/// Spawns a server with the stub embedder and the given text extractor.
///
/// Pass a `StaticTextExtractor` to script OCR outcomes, or a `VisionExtractor` pointed at
/// [`spawn_fake_vision`](super::fake_vision::spawn_fake_vision) to exercise the real client.
pub async fn spawn_test_server<X>(
    extractor: X,
    config: TestServerConfig,
) -> Result<TestServer, ServerStartupError>
where
    X: TextExtractor + 'static,
{
    let port = if config.port == 0 {
        find_available_port().await?
    } else {
        config.port
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let embedder = Arc::new(LazyEmbedder::new(SentenceConfig::stub()));
    if config.preload_model {
        embedder
            .preload()
            .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
    }

    let store = Arc::new(MemoryStore::new());
    let pipeline = GradingPipeline::new(embedder, Arc::new(extractor));
    let mut state = HandlerState::new(pipeline, Arc::clone(&store));
    if let Some(limit) = config.max_upload_bytes {
        state = state.with_upload_limit(limit);
    }

    let app = create_router_with_state(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr: local_addr,
        store,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}
