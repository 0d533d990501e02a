//! Papergrader library crate (used by the server binary and integration tests).
//!
//! Grades free-text exam answers by semantic similarity to a model answer. Answers arrive
//! typed or as photographed pages, which are read through OCR first.
//!
//! ## Core Types
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`GradingPipeline`], [`AnswerSource`], [`GradingResult`] - Answer resolution and scoring
//! - [`MemoryStore`] - Questions and graded submissions
//!
//! ## Embedding & Scoring
//! - [`SentenceEmbedder`], [`LazyEmbedder`] - Sentence embeddings (model or stub)
//! - [`cosine_similarity`], [`clamp_similarity`], [`normalized_score`]
//!
//! ## OCR
//! - [`TextExtractor`] - Image-to-text seam
//! - [`VisionExtractor`], [`OcrConfig`] - Google Cloud Vision client
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod grading;
pub mod hashing;
pub mod ocr;
pub mod scoring;
pub mod storage;

pub use config::{Config, ConfigError};
pub use constants::{DimValidationError, STATUS_HEADER, validate_embedding_dim};
pub use embedding::{
    Embedder, EmbeddingError, EmbeddingVector, LazyEmbedder, STUB_MODEL_NAME, SentenceConfig,
    SentenceEmbedder,
};
pub use gateway::{HandlerState, create_router_with_state};
pub use grading::{AnswerSource, GradingError, GradingPipeline, GradingResult, Question};
pub use hashing::{content_digest, short_digest};
#[cfg(any(test, feature = "mock"))]
pub use ocr::StaticTextExtractor;
pub use ocr::{OcrConfig, OcrError, TextExtractor, VisionCredentials, VisionExtractor};
pub use scoring::{clamp_similarity, cosine_similarity, normalized_score};
pub use storage::{MemoryStore, NewSubmission, StorageError, Submission};
