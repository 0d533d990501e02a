use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::grading::{GradingResult, Question};
use crate::scoring::normalized_score;
use crate::storage::Submission;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QuestionResponse {
    pub id: u64,
    pub prompt: String,
    pub model_answer_text: String,
}

impl From<Question> for QuestionResponse {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            prompt: question.prompt,
            model_answer_text: question.model_answer_text,
        }
    }
}

/// Result of grading one answer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScoreResponse {
    /// Clamped cosine similarity in `[0, 1]`.
    pub similarity_score: f32,
    /// `similarity_score` as a percentage, two decimals.
    pub normalized_score: f64,
    pub model_answer: String,
    /// The typed answer, or what OCR read from the image.
    pub student_answer: String,
}

impl ScoreResponse {
    pub fn new(question: &Question, result: GradingResult) -> Self {
        Self {
            similarity_score: result.similarity_score,
            normalized_score: result.normalized_score(),
            model_answer: question.model_answer_text.clone(),
            student_answer: result.resolved_student_answer,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SubmissionResponse {
    pub id: u64,
    pub question_id: u64,
    pub student_name: String,
    pub student_answer_text: String,
    pub similarity_score: f32,
    pub normalized_score: f64,
    pub created_at: DateTime<Utc>,
}

impl From<Submission> for SubmissionResponse {
    fn from(submission: Submission) -> Self {
        Self {
            id: submission.id,
            question_id: submission.question_id,
            student_name: submission.student_name,
            student_answer_text: submission.student_answer_text,
            similarity_score: submission.similarity_score,
            normalized_score: normalized_score(submission.similarity_score),
            created_at: submission.created_at,
        }
    }
}
