use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::debug;

use crate::grading::Question;

use super::error::StorageError;
use super::model::{NewSubmission, Submission};

#[derive(Default)]
struct Tables {
    next_question_id: u64,
    next_submission_id: u64,
    questions: HashMap<u64, Question>,
    submissions: Vec<Submission>,
}

/// In-process store for questions and graded submissions.
///
/// Ids start at 1 and only increase. Every method takes the lock once, so each call is
/// atomic with respect to the others.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tables = self.tables.read();
        f.debug_struct("MemoryStore")
            .field("questions", &tables.questions.len())
            .field("submissions", &tables.submissions.len())
            .finish()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a question. The model answer must contain non-whitespace text.
    pub fn create_question(
        &self,
        prompt: String,
        model_answer_text: String,
    ) -> Result<Question, StorageError> {
        if model_answer_text.trim().is_empty() {
            return Err(StorageError::EmptyModelAnswer);
        }

        let mut tables = self.tables.write();
        tables.next_question_id += 1;
        let question = Question {
            id: tables.next_question_id,
            prompt,
            model_answer_text,
        };
        tables.questions.insert(question.id, question.clone());

        debug!(question_id = question.id, "Question created");
        Ok(question)
    }

    pub fn get_question(&self, id: u64) -> Result<Question, StorageError> {
        self.tables
            .read()
            .questions
            .get(&id)
            .cloned()
            .ok_or(StorageError::QuestionNotFound { id })
    }

    /// Records a graded answer, stamping it with the current time.
    pub fn record_submission(&self, new: NewSubmission) -> Result<Submission, StorageError> {
        let mut tables = self.tables.write();
        if !tables.questions.contains_key(&new.question_id) {
            return Err(StorageError::QuestionNotFound {
                id: new.question_id,
            });
        }

        tables.next_submission_id += 1;
        let submission = Submission {
            id: tables.next_submission_id,
            question_id: new.question_id,
            student_name: new.student_name,
            student_answer_text: new.student_answer_text,
            similarity_score: new.similarity_score,
            created_at: Utc::now(),
        };
        tables.submissions.push(submission.clone());

        debug!(
            question_id = submission.question_id,
            submission_id = submission.id,
            "Submission recorded"
        );
        Ok(submission)
    }

    /// Submissions for a question, oldest first.
    pub fn list_submissions(&self, question_id: u64) -> Result<Vec<Submission>, StorageError> {
        let tables = self.tables.read();
        if !tables.questions.contains_key(&question_id) {
            return Err(StorageError::QuestionNotFound { id: question_id });
        }

        Ok(tables
            .submissions
            .iter()
            .filter(|s| s.question_id == question_id)
            .cloned()
            .collect())
    }

    pub fn question_count(&self) -> usize {
        self.tables.read().questions.len()
    }
}
