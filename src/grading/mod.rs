//! Grading pipeline: answer source → text → embeddings → clamped cosine similarity.
//!
//! ```text
//! AnswerSource::Text ─────────────┐
//!                                 ├─► embed(model answer), embed(student answer)
//! AnswerSource::Image ─► OCR ─────┘          │
//!                                            ▼
//!                             cosine_similarity ─► clamp to [0, 1]
//! ```
//!
//! The pipeline holds `Arc`s to its embedder and extractor and is cheap to clone.

pub mod error;
pub mod pipeline;
pub mod types;


pub use error::GradingError;
pub use pipeline::GradingPipeline;
pub use types::{AnswerSource, GradingResult, Question};
