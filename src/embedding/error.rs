use std::path::PathBuf;
use thiserror::Error;

use crate::constants::DimValidationError;

/// Failures while loading the sentence encoder or embedding answer text.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("sentence model not found at path: {path}")]
    ModelNotFound { path: PathBuf },

    #[error("failed to load sentence model: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("embedding inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    #[error("invalid embedder configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The encoder produced a vector of the wrong length.
    #[error("encoder output has the wrong size: {0}")]
    Dimension(#[from] DimValidationError),
}

impl From<candle_core::Error> for EmbeddingError {
    fn from(err: candle_core::Error) -> Self {
        EmbeddingError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}
