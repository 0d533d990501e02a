use serde::Serialize;

use crate::scoring::normalized_score;

use super::error::GradingError;

/// A question with its reference answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub id: u64,
    pub prompt: String,
    /// Reference text student answers are compared against. Never empty.
    pub model_answer_text: String,
}

/// Where a student's answer comes from. Exactly one per request.
#[derive(Clone, PartialEq, Eq)]
pub enum AnswerSource {
    /// Typed answer.
    Text(String),
    /// Photo or scan of a handwritten answer.
    Image(Vec<u8>),
}

impl std::fmt::Debug for AnswerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerSource::Text(text) => f.debug_tuple("Text").field(&text.len()).finish(),
            AnswerSource::Image(bytes) => f.debug_tuple("Image").field(&bytes.len()).finish(),
        }
    }
}

impl AnswerSource {
    /// Builds a source from optional form fields.
    ///
    /// Fails with [`GradingError::ConflictingAnswerSources`] if both are present and
    /// [`GradingError::MissingAnswer`] if neither is.
    pub fn from_parts(text: Option<String>, image: Option<Vec<u8>>) -> Result<Self, GradingError> {
        match (text, image) {
            (Some(_), Some(_)) => Err(GradingError::ConflictingAnswerSources),
            (Some(text), None) => Ok(AnswerSource::Text(text)),
            (None, Some(image)) => Ok(AnswerSource::Image(image)),
            (None, None) => Err(GradingError::MissingAnswer),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AnswerSource::Text(_) => "text",
            AnswerSource::Image(_) => "image",
        }
    }
}

/// Outcome of grading one answer.
#[derive(Debug, Clone, PartialEq)]
pub struct GradingResult {
    /// Cosine similarity clamped to `[0, 1]`.
    pub similarity_score: f32,
    /// Unclamped cosine, kept for diagnostics.
    pub raw_similarity: f32,
    /// The typed text, or the text OCR read from the image.
    pub resolved_student_answer: String,
}

impl GradingResult {
    /// Score as a percentage rounded to two decimals.
    pub fn normalized_score(&self) -> f64 {
        normalized_score(self.similarity_score)
    }
}
