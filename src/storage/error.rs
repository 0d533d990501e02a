use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StorageError {
    #[error("question {id} not found")]
    QuestionNotFound { id: u64 },

    #[error("model answer must not be empty")]
    EmptyModelAnswer,
}
