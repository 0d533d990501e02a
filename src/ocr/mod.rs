//! Image-to-text extraction.
//!
//! [`TextExtractor`] is the seam the grading pipeline depends on. [`VisionExtractor`] talks to
//! Google Cloud Vision; credentials are resolved at extraction time, so a server without OCR
//! configured still grades typed answers.

pub mod config;
pub mod error;
pub mod vision;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use config::{OcrConfig, VisionCredentials};
pub use error::OcrError;
pub use vision::VisionExtractor;

#[cfg(any(test, feature = "mock"))]
pub use mock::StaticTextExtractor;

use async_trait::async_trait;

/// Turns image bytes into text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extracts text from `image`.
    ///
    /// Empty input fails with [`OcrError::EmptyInput`] before any provider call.
    async fn extract(&self, image: &[u8]) -> Result<String, OcrError>;

    /// `true` if a provider credential is configured and looks usable.
    fn is_available(&self) -> bool;
}
