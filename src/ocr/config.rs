use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::ConfigError;
use crate::constants::{DEFAULT_OCR_TIMEOUT_SECS, DEFAULT_VISION_ENDPOINT};

use super::error::OcrError;

/// Where the Vision API key comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum VisionCredentials {
    /// Key given inline.
    ApiKey(String),
    /// File whose (trimmed) contents are the key. Read on every extraction.
    KeyFile(PathBuf),
}

impl std::fmt::Debug for VisionCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VisionCredentials::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            VisionCredentials::KeyFile(path) => f.debug_tuple("KeyFile").field(path).finish(),
        }
    }
}

impl VisionCredentials {
    /// Returns the API key, reading the key file if needed.
    pub fn resolve(&self) -> Result<String, OcrError> {
        let key = match self {
            VisionCredentials::ApiKey(key) => key.trim().to_string(),
            VisionCredentials::KeyFile(path) => std::fs::read_to_string(path)
                .map_err(|e| OcrError::ProviderUnavailable {
                    reason: format!("cannot read key file {}: {}", path.display(), e),
                })?
                .trim()
                .to_string(),
        };

        if key.is_empty() {
            return Err(OcrError::ProviderUnavailable {
                reason: "Vision API key is empty".to_string(),
            });
        }

        Ok(key)
    }

    /// Cheap check without reading the key file.
    pub fn looks_usable(&self) -> bool {
        match self {
            VisionCredentials::ApiKey(key) => !key.trim().is_empty(),
            VisionCredentials::KeyFile(path) => path.is_file(),
        }
    }
}

/// OCR provider settings.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Base URL of the Vision API (no trailing path).
    pub endpoint: String,
    /// `None` leaves OCR unconfigured; image answers then fail with `ProviderUnavailable`.
    pub credentials: Option<VisionCredentials>,
    /// Upper bound for one provider round trip.
    pub timeout: Duration,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_VISION_ENDPOINT.to_string(),
            credentials: None,
            timeout: Duration::from_secs(DEFAULT_OCR_TIMEOUT_SECS),
        }
    }
}

impl OcrConfig {
    pub const ENV_API_KEY: &'static str = "PAPERGRADER_VISION_API_KEY";
    pub const ENV_KEY_FILE: &'static str = "PAPERGRADER_VISION_KEY_FILE";
    pub const ENV_ENDPOINT: &'static str = "PAPERGRADER_VISION_ENDPOINT";
    pub const ENV_TIMEOUT_SECS: &'static str = "PAPERGRADER_OCR_TIMEOUT_SECS";

    /// Reads OCR settings. A missing credential is not an error here.
    ///
    /// An inline key wins over a key file when both are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let credentials = match non_empty_var(Self::ENV_API_KEY) {
            Some(key) => Some(VisionCredentials::ApiKey(key)),
            None => non_empty_var(Self::ENV_KEY_FILE)
                .map(|path| VisionCredentials::KeyFile(PathBuf::from(path))),
        };

        let endpoint = non_empty_var(Self::ENV_ENDPOINT)
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or(defaults.endpoint);

        let timeout = match env::var(Self::ENV_TIMEOUT_SECS) {
            Ok(value) => {
                let secs: u64 = value.trim().parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::InvalidValue {
                        name: Self::ENV_TIMEOUT_SECS,
                        value: value.clone(),
                        reason: e.to_string(),
                    }
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue {
                        name: Self::ENV_TIMEOUT_SECS,
                        value,
                        reason: "must be greater than zero".to_string(),
                    });
                }
                Duration::from_secs(secs)
            }
            Err(_) => defaults.timeout,
        };

        Ok(Self {
            endpoint,
            credentials,
            timeout,
        })
    }

    /// Points the client at another Vision-compatible endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_credentials(mut self, credentials: VisionCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
