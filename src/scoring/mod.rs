//! Vector comparison and score shaping.
//!
//! [`cosine_similarity`] compares two embeddings from the same model. [`clamp_similarity`]
//! maps the raw cosine into the `[0, 1]` range reported to graders, and
//! [`normalized_score`] turns it into a rounded percentage for display.

pub mod similarity;


pub use similarity::{clamp_similarity, cosine_similarity, normalized_score};
