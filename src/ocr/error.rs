use thiserror::Error;

/// Failures while turning an uploaded image into text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OcrError {
    #[error("image is empty")]
    EmptyInput,

    #[error("OCR provider unavailable: {reason}")]
    ProviderUnavailable { reason: String },

    #[error("text extraction failed: {reason}")]
    ExtractionFailed { reason: String },
}
