use chrono::{DateTime, Utc};
use serde::Serialize;

/// A graded answer as stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub id: u64,
    pub question_id: u64,
    pub student_name: String,
    /// Typed answer, or the text read from the uploaded image.
    pub student_answer_text: String,
    /// Clamped similarity in `[0, 1]`.
    pub similarity_score: f32,
    pub created_at: DateTime<Utc>,
}

/// Fields the caller supplies when recording a submission.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub question_id: u64,
    pub student_name: String,
    pub student_answer_text: String,
    pub similarity_score: f32,
}
