use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::embedding::{Embedder, EmbeddingError};
use crate::ocr::TextExtractor;
use crate::scoring::{clamp_similarity, cosine_similarity};

use super::error::GradingError;
use super::types::{AnswerSource, GradingResult, Question};

/// Resolves an answer to text, embeds it next to the model answer and scores the pair.
pub struct GradingPipeline<E, X> {
    embedder: Arc<E>,
    extractor: Arc<X>,
}

impl<E, X> Clone for GradingPipeline<E, X> {
    fn clone(&self) -> Self {
        Self {
            embedder: Arc::clone(&self.embedder),
            extractor: Arc::clone(&self.extractor),
        }
    }
}

impl<E, X> std::fmt::Debug for GradingPipeline<E, X> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GradingPipeline").finish_non_exhaustive()
    }
}

impl<E, X> GradingPipeline<E, X>
where
    E: Embedder + 'static,
    X: TextExtractor + 'static,
{
    pub fn new(embedder: Arc<E>, extractor: Arc<X>) -> Self {
        Self {
            embedder,
            extractor,
        }
    }

    pub fn embedder(&self) -> &Arc<E> {
        &self.embedder
    }

    pub fn extractor(&self) -> &Arc<X> {
        &self.extractor
    }

    /// Turns an answer source into text: typed text as-is, images through OCR.
    ///
    /// Typed text must be non-empty. It is otherwise passed through verbatim.
    pub async fn resolve_answer(&self, source: AnswerSource) -> Result<String, GradingError> {
        match source {
            AnswerSource::Text(text) => {
                if text.is_empty() {
                    return Err(GradingError::MissingAnswer);
                }
                Ok(text)
            }
            AnswerSource::Image(image) => Ok(self.extractor.extract(&image).await?),
        }
    }

    /// Grades `source` against the question's model answer.
    ///
    /// # Panics
    ///
    /// Resumes the panic if the embedder returns vectors of different dimension.
    #[instrument(skip(self, question, source), fields(question_id = question.id, source = source.kind()))]
    pub async fn grade(
        &self,
        question: &Question,
        source: AnswerSource,
    ) -> Result<GradingResult, GradingError> {
        let student_answer = self.resolve_answer(source).await?;
        debug!(answer_chars = student_answer.len(), "Answer resolved");

        let embedder = Arc::clone(&self.embedder);
        let model_answer = question.model_answer_text.clone();
        let student_text = student_answer.clone();

        let task = tokio::task::spawn_blocking(move || -> Result<f32, EmbeddingError> {
            let model_vec = embedder.embed(&model_answer)?;
            let student_vec = embedder.embed(&student_text)?;
            Ok(cosine_similarity(&model_vec, &student_vec))
        });

        let raw_similarity = match task.await {
            Ok(result) => result?,
            Err(join_err) if join_err.is_panic() => std::panic::resume_unwind(join_err.into_panic()),
            Err(join_err) => {
                return Err(GradingError::Embedding(EmbeddingError::InferenceFailed {
                    reason: format!("embedding task cancelled: {}", join_err),
                }));
            }
        };

        let similarity_score = clamp_similarity(raw_similarity);

        info!(
            raw_similarity,
            similarity = similarity_score,
            model = self.embedder.model_id(),
            "Answer graded"
        );

        Ok(GradingResult {
            similarity_score,
            raw_similarity,
            resolved_student_answer: student_answer,
        })
    }
}
