//! Sentence embeddings for answer comparison.
//!
//! - [`SentenceEmbedder`] runs a BERT-family encoder (or a deterministic stub).
//! - [`LazyEmbedder`] defers model loading to first use and shares one instance.
//! - [`Embedder`] is the seam the grading pipeline depends on.

/// Mean-pooled BERT encoder.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod embedder;
mod error;
mod lazy;
/// Sentence embedder and its configuration.
pub mod sentence;
/// Tokenizer loading helpers.
pub mod utils;
mod vector;

pub use embedder::Embedder;
pub use error::EmbeddingError;
pub use lazy::LazyEmbedder;
pub use sentence::{STUB_MODEL_NAME, SentenceConfig, SentenceEmbedder};
pub use vector::EmbeddingVector;
