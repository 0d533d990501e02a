use crate::embedding::SentenceEmbedder;
use crate::embedding::error::EmbeddingError;
use crate::embedding::vector::EmbeddingVector;

/// Anything that can turn answer text into a comparable vector.
///
/// Implementations are called from blocking threads and must be thread-safe.
pub trait Embedder: Send + Sync {
    /// Embeds `text`. Every call on the same instance returns the same dimension.
    fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError>;

    fn embedding_dim(&self) -> usize;

    /// Model identifier for logs and readiness reports.
    fn model_id(&self) -> &str;

    /// `false` while the model is still waiting to be loaded.
    fn is_ready(&self) -> bool {
        true
    }

    /// `true` for the hashed bag-of-words stand-in.
    fn is_stub(&self) -> bool {
        false
    }
}

impl<T: Embedder + ?Sized> Embedder for std::sync::Arc<T> {
    fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        (**self).embed(text)
    }

    fn embedding_dim(&self) -> usize {
        (**self).embedding_dim()
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn is_stub(&self) -> bool {
        (**self).is_stub()
    }
}

impl Embedder for SentenceEmbedder {
    fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        SentenceEmbedder::embed(self, text)
    }

    fn embedding_dim(&self) -> usize {
        SentenceEmbedder::embedding_dim(self)
    }

    fn model_id(&self) -> &str {
        self.model_name()
    }

    fn is_stub(&self) -> bool {
        SentenceEmbedder::is_stub(self)
    }
}
