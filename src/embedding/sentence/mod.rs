//! Sentence embedder (BERT safetensors + tokenizer).
//!
//! Use [`SentenceConfig::stub`] for tests and local runs without model files. The stub is a
//! hashed bag-of-words: answers that share vocabulary score high, unrelated ones score near
//! zero.

/// Sentence embedder configuration.
pub mod config;


pub use config::{STUB_MODEL_NAME, SentenceConfig};

use std::sync::Arc;

use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::constants::validate_embedding_dim;
use crate::embedding::bert::BertEncoder;
use crate::embedding::device::{device_label, select_device};
use crate::embedding::error::EmbeddingError;
use crate::embedding::utils::load_tokenizer;
use crate::embedding::vector::EmbeddingVector;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "could", "should", "may", "might", "must", "shall",
    "can", "need", "dare", "ought", "used", "to", "of", "in", "for", "on", "with", "at", "by",
    "from", "as", "into", "through", "during", "before", "after", "above", "below", "between",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why", "how",
    "all", "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not", "only",
    "own", "same", "so", "than", "too", "very", "just", "and", "but", "if", "or", "because",
    "until", "while", "what", "which", "who", "whom", "this", "that", "these", "those", "am",
    "it", "its",
];

enum EmbedderBackend {
    Model {
        encoder: BertEncoder,
        tokenizer: Arc<Tokenizer>,
        device: Device,
    },
    Stub,
}

/// Turns answer text into fixed-size, L2-normalized vectors.
pub struct SentenceEmbedder {
    backend: EmbedderBackend,
    config: SentenceConfig,
}

impl std::fmt::Debug for SentenceEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceEmbedder")
            .field(
                "backend",
                &match &self.backend {
                    EmbedderBackend::Model { device, .. } => format!("Model({:?})", device),
                    EmbedderBackend::Stub => "Stub".to_string(),
                },
            )
            .field("model_name", &self.config.model_name)
            .field("embedding_dim", &self.config.embedding_dim)
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl SentenceEmbedder {
    /// Loads the embedder from a config (stub mode is supported).
    pub fn load(config: SentenceConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        if config.testing_stub {
            warn!(
                embedding_dim = config.embedding_dim,
                "Sentence embedder running in STUB mode (hashed bag-of-words)"
            );
            return Ok(Self {
                backend: EmbedderBackend::Stub,
                config,
            });
        }

        if !config.model_available() {
            return Err(EmbeddingError::ModelNotFound {
                path: config.model_dir.clone(),
            });
        }

        let device = select_device();
        debug!(device = device_label(&device), "Selected compute device");

        let (encoder, tokenizer) = Self::load_model(&config, &device)?;
        let hidden_size = encoder.hidden_size();
        let embedder = Self::from_encoder(config, encoder, tokenizer, device)?;

        info!(
            model = %embedder.config.model_name,
            model_dir = %embedder.config.model_dir.display(),
            embedding_dim = embedder.config.embedding_dim,
            max_seq_len = embedder.config.max_seq_len,
            hidden_size,
            "Sentence embedding model loaded"
        );

        Ok(embedder)
    }

    /// Builds a model-backed embedder from an encoder and tokenizer already in memory.
    ///
    /// `config.embedding_dim` may not exceed the encoder's hidden size. A smaller value keeps
    /// the leading `embedding_dim` components of the pooled vector before normalization.
    pub fn from_encoder(
        config: SentenceConfig,
        encoder: BertEncoder,
        tokenizer: Tokenizer,
        device: Device,
    ) -> Result<Self, EmbeddingError> {
        check_output_dim(config.embedding_dim, encoder.hidden_size())?;

        Ok(Self {
            backend: EmbedderBackend::Model {
                encoder,
                tokenizer: Arc::new(tokenizer),
                device,
            },
            config,
        })
    }

    fn load_model(
        config: &SentenceConfig,
        device: &Device,
    ) -> Result<(BertEncoder, Tokenizer), EmbeddingError> {
        let tokenizer_source = if config.tokenizer_available() {
            config.tokenizer_path.as_path()
        } else {
            config.model_dir.as_path()
        };

        let tokenizer = load_tokenizer(tokenizer_source, config.max_seq_len).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            }
        })?;

        let encoder = BertEncoder::load(&config.model_dir, device).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load BERT encoder: {}", e),
            }
        })?;

        Ok((encoder, tokenizer))
    }

    /// Embeds a single string. Text with no usable tokens yields the zero vector.
    pub fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        match &self.backend {
            EmbedderBackend::Model {
                encoder,
                tokenizer,
                device,
            } => self.embed_with_model(text, encoder, tokenizer, device),
            EmbedderBackend::Stub => Ok(self.embed_stub(text)),
        }
    }

    /// Embeds several strings, preserving order.
    pub fn embed_batch(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    fn embed_with_model(
        &self,
        text: &str,
        encoder: &BertEncoder,
        tokenizer: &Tokenizer,
        device: &Device,
    ) -> Result<EmbeddingVector, EmbeddingError> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        let ids = encoding.get_ids();
        if ids.is_empty() {
            return Ok(EmbeddingVector::zeros(self.config.embedding_dim));
        }

        debug!(
            text_len = text.len(),
            token_count = ids.len(),
            "Generating embedding (encoder forward pass)"
        );

        let input_ids = Tensor::new(ids, device)?.unsqueeze(0)?;
        let token_type_ids = Tensor::new(encoding.get_type_ids(), device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(encoding.get_attention_mask(), device)?.unsqueeze(0)?;

        let pooled = encoder
            .encode(&input_ids, &token_type_ids, &attention_mask)
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("Encoder forward pass failed: {}", e),
            })?;

        let mut values = pooled.squeeze(0)?.to_vec1::<f32>()?;
        values.truncate(self.config.embedding_dim);
        validate_embedding_dim(values.len(), self.config.embedding_dim)?;

        Ok(EmbeddingVector::new(values).normalized())
    }

    fn embed_stub(&self, text: &str) -> EmbeddingVector {
        let dim = self.config.embedding_dim;
        let mut values = vec![0.0f32; dim];
        let mut token_count = 0usize;

        for token in stub_tokens(text) {
            let bucket = (fnv1a64(token.as_bytes()) % dim as u64) as usize;
            values[bucket] += 1.0;
            token_count += 1;
        }

        debug!(
            text_len = text.len(),
            token_count, "Generating stub embedding"
        );

        EmbeddingVector::new(values).normalized()
    }

    /// Returns the configured output embedding dimension.
    pub fn embedding_dim(&self) -> usize {
        self.config.embedding_dim
    }

    /// Model identifier reported to clients.
    pub fn model_name(&self) -> &str {
        &self.config.model_name
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EmbedderBackend::Stub)
    }

    /// Returns `true` if a model is loaded.
    pub fn has_model(&self) -> bool {
        matches!(self.backend, EmbedderBackend::Model { .. })
    }

    /// `"stub"` or the inference device (`"cpu"`, `"cuda"`, `"metal"`).
    pub fn device_label(&self) -> &'static str {
        match &self.backend {
            EmbedderBackend::Model { device, .. } => device_label(device),
            EmbedderBackend::Stub => "stub",
        }
    }

    /// Returns the embedder configuration.
    pub fn config(&self) -> &SentenceConfig {
        &self.config
    }
}

fn check_output_dim(embedding_dim: usize, hidden_size: usize) -> Result<(), EmbeddingError> {
    if embedding_dim == 0 || embedding_dim > hidden_size {
        return Err(EmbeddingError::InvalidConfig {
            reason: format!(
                "embedding_dim ({}) must be between 1 and the model hidden_size ({})",
                embedding_dim, hidden_size
            ),
        });
    }

    if embedding_dim < hidden_size {
        warn!(
            embedding_dim,
            hidden_size, "embedding_dim is below the model hidden size; pooled vectors are truncated"
        );
    }

    Ok(())
}

/// Lowercased alphanumeric words with stop words removed.
fn stub_tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .filter(|word| !STOP_WORDS.contains(&word.as_str()))
}

fn fnv1a64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}
