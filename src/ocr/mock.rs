//! Canned [`TextExtractor`] for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::TextExtractor;
use super::error::OcrError;

/// Returns a fixed text (or error) and counts how often it was asked.
///
/// Empty input still yields [`OcrError::EmptyInput`], matching the real client.
#[derive(Debug)]
pub struct StaticTextExtractor {
    outcome: Result<String, OcrError>,
    calls: AtomicUsize,
}

impl StaticTextExtractor {
    pub fn returning(text: impl Into<String>) -> Self {
        Self {
            outcome: Ok(text.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: OcrError) -> Self {
        Self {
            outcome: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Behaves like an extractor with no credential configured.
    pub fn unavailable() -> Self {
        Self::failing(OcrError::ProviderUnavailable {
            reason: "no credential configured".to_string(),
        })
    }

    /// Number of `extract` calls so far, including rejected ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextExtractor for StaticTextExtractor {
    async fn extract(&self, image: &[u8]) -> Result<String, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if image.is_empty() {
            return Err(OcrError::EmptyInput);
        }
        self.outcome.clone()
    }

    fn is_available(&self) -> bool {
        !matches!(self.outcome, Err(OcrError::ProviderUnavailable { .. }))
    }
}
