//! In-memory persistence for questions and graded submissions.

pub mod error;
mod memory;
mod model;

pub use error::StorageError;
pub use memory::MemoryStore;
pub use model::{NewSubmission, Submission};
