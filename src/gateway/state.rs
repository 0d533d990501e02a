use std::sync::Arc;

use crate::constants::DEFAULT_MAX_UPLOAD_BYTES;
use crate::embedding::Embedder;
use crate::grading::GradingPipeline;
use crate::ocr::TextExtractor;
use crate::storage::MemoryStore;

/// Shared state handed to every handler.
pub struct HandlerState<E, X> {
    pub pipeline: GradingPipeline<E, X>,

    pub store: Arc<MemoryStore>,

    /// Request body cap applied to the upload routes.
    pub max_upload_bytes: usize,
}

impl<E, X> Clone for HandlerState<E, X> {
    fn clone(&self) -> Self {
        Self {
            pipeline: self.pipeline.clone(),
            store: Arc::clone(&self.store),
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

impl<E, X> HandlerState<E, X>
where
    E: Embedder + 'static,
    X: TextExtractor + 'static,
{
    pub fn new(pipeline: GradingPipeline<E, X>, store: Arc<MemoryStore>) -> Self {
        Self {
            pipeline,
            store,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_upload_limit(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}
