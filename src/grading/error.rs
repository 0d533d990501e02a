use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::ocr::OcrError;

#[derive(Debug, Error)]
pub enum GradingError {
    #[error("no answer provided: send either answer text or an answer image")]
    MissingAnswer,

    #[error("both answer text and answer image provided: send exactly one")]
    ConflictingAnswerSources,

    #[error("answer image is empty")]
    EmptyInput,

    #[error("OCR provider unavailable: {reason}")]
    ProviderUnavailable { reason: String },

    #[error("text extraction failed: {reason}")]
    ExtractionFailed { reason: String },

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
}

impl From<OcrError> for GradingError {
    fn from(err: OcrError) -> Self {
        match err {
            OcrError::EmptyInput => GradingError::EmptyInput,
            OcrError::ProviderUnavailable { reason } => GradingError::ProviderUnavailable { reason },
            OcrError::ExtractionFailed { reason } => GradingError::ExtractionFailed { reason },
        }
    }
}
