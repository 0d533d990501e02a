//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `PAPERGRADER_*` environment variables.
//! OCR provider settings live in [`OcrConfig`](crate::ocr::OcrConfig) so that a missing
//! credential is only noticed when an image is actually submitted.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_EMBEDDING_DIM, DEFAULT_MAX_SEQ_LEN, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_MODEL_NAME,
};
use crate::embedding::SentenceConfig;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `PAPERGRADER_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Identifier of the sentence-embedding model (reported, not downloaded).
    pub model_name: String,

    /// Directory holding `config.json`, `model.safetensors` and `tokenizer.json`.
    pub model_path: Option<PathBuf>,

    /// Output embedding dimension. Default: `384`.
    pub embedding_dim: usize,

    /// Max tokens fed to the encoder. Default: `256`.
    pub max_seq_len: usize,

    /// Load the embedding model before accepting traffic. Default: `true`.
    pub preload_model: bool,

    /// Max request body size for uploads. Default: 10 MiB.
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            model_path: None,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
            preload_model: true,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "PAPERGRADER_PORT";
    const ENV_BIND_ADDR: &'static str = "PAPERGRADER_BIND_ADDR";
    const ENV_MODEL_NAME: &'static str = "PAPERGRADER_MODEL_NAME";
    const ENV_MODEL_PATH: &'static str = "PAPERGRADER_MODEL_PATH";
    const ENV_EMBEDDING_DIM: &'static str = "PAPERGRADER_EMBEDDING_DIM";
    const ENV_MAX_SEQ_LEN: &'static str = "PAPERGRADER_MAX_SEQ_LEN";
    const ENV_PRELOAD_MODEL: &'static str = "PAPERGRADER_PRELOAD_MODEL";
    const ENV_MAX_UPLOAD_BYTES: &'static str = "PAPERGRADER_MAX_UPLOAD_BYTES";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let model_name = Self::parse_string_from_env(Self::ENV_MODEL_NAME, defaults.model_name);
        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);
        let embedding_dim =
            Self::parse_usize_from_env(Self::ENV_EMBEDDING_DIM, defaults.embedding_dim)?;
        let max_seq_len = Self::parse_usize_from_env(Self::ENV_MAX_SEQ_LEN, defaults.max_seq_len)?;
        let preload_model =
            Self::parse_bool_from_env(Self::ENV_PRELOAD_MODEL, defaults.preload_model)?;
        let max_upload_bytes =
            Self::parse_usize_from_env(Self::ENV_MAX_UPLOAD_BYTES, defaults.max_upload_bytes)?;

        Ok(Self {
            port,
            bind_addr,
            model_name,
            model_path,
            embedding_dim,
            max_seq_len,
            preload_model,
            max_upload_bytes,
        })
    }

    /// Validates paths and basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.model_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        if self.embedding_dim == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_EMBEDDING_DIM,
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.max_seq_len == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_MAX_SEQ_LEN,
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        match self.bind_addr {
            IpAddr::V4(addr) => format!("{}:{}", addr, self.port),
            IpAddr::V6(addr) => format!("[{}]:{}", addr, self.port),
        }
    }

    /// Builds the embedder configuration. Without a model path the embedder runs as a stub.
    pub fn sentence_config(&self) -> SentenceConfig {
        let mut sentence = match &self.model_path {
            Some(path) => SentenceConfig {
                model_name: self.model_name.clone(),
                ..SentenceConfig::new(path.clone())
            },
            None => SentenceConfig::stub(),
        };

        sentence.embedding_dim = self.embedding_dim;
        sentence.max_seq_len = self.max_seq_len;
        sentence
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    fn parse_usize_from_env(name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env::var(name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                    name,
                    value,
                    reason: e.to_string(),
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_bool_from_env(name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match env::var(name) {
            Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::InvalidValue {
                    name,
                    value,
                    reason: "expected true/false".to_string(),
                }),
            },
            Err(_) => Ok(default),
        }
    }
}
