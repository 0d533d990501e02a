use std::sync::OnceLock;
use std::time::Instant;

use parking_lot::Mutex;
use tracing::{error, info};

use crate::embedding::embedder::Embedder;
use crate::embedding::error::EmbeddingError;
use crate::embedding::sentence::{SentenceConfig, SentenceEmbedder};
use crate::embedding::vector::EmbeddingVector;

/// Process-wide embedder that loads its model on first use.
///
/// Concurrent first callers block on a single load; later callers get the cached instance.
/// A failed load is not cached, so the next call tries again.
pub struct LazyEmbedder {
    config: SentenceConfig,
    cell: OnceLock<SentenceEmbedder>,
    init_guard: Mutex<()>,
}

impl std::fmt::Debug for LazyEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyEmbedder")
            .field("model_name", &self.config.model_name)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl LazyEmbedder {
    pub fn new(config: SentenceConfig) -> Self {
        Self {
            config,
            cell: OnceLock::new(),
            init_guard: Mutex::new(()),
        }
    }

    /// Returns the loaded embedder, loading it if this is the first call.
    pub fn get_or_load(&self) -> Result<&SentenceEmbedder, EmbeddingError> {
        if let Some(embedder) = self.cell.get() {
            return Ok(embedder);
        }

        let _guard = self.init_guard.lock();
        if let Some(embedder) = self.cell.get() {
            return Ok(embedder);
        }

        let started = Instant::now();
        let embedder = SentenceEmbedder::load(self.config.clone()).map_err(|e| {
            error!(error = %e, model = %self.config.model_name, "Embedding model load failed");
            e
        })?;
        info!(
            model = %self.config.model_name,
            stub = embedder.is_stub(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Embedding model ready"
        );

        Ok(self.cell.get_or_init(|| embedder))
    }

    /// Loads eagerly so the first request does not pay the load cost.
    pub fn preload(&self) -> Result<(), EmbeddingError> {
        self.get_or_load().map(|_| ())
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// `true` when configured without model files.
    pub fn is_stub(&self) -> bool {
        self.config.testing_stub
    }

    pub fn config(&self) -> &SentenceConfig {
        &self.config
    }
}

impl Embedder for LazyEmbedder {
    fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        self.get_or_load()?.embed(text)
    }

    fn embedding_dim(&self) -> usize {
        self.config.embedding_dim
    }

    fn model_id(&self) -> &str {
        &self.config.model_name
    }

    fn is_ready(&self) -> bool {
        self.is_loaded()
    }

    fn is_stub(&self) -> bool {
        LazyEmbedder::is_stub(self)
    }
}
