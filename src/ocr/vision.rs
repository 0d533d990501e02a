//! Google Cloud Vision `images:annotate` client.

use std::time::Instant;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::hashing::short_digest;

use super::TextExtractor;
use super::config::OcrConfig;
use super::error::OcrError;

const FEATURE_DOCUMENT_TEXT: &str = "DOCUMENT_TEXT_DETECTION";
const API_KEY_HEADER: &str = "x-goog-api-key";
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Extracts handwritten or printed text with one `DOCUMENT_TEXT_DETECTION` call per image.
pub struct VisionExtractor {
    config: OcrConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for VisionExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisionExtractor")
            .field("endpoint", &self.config.endpoint)
            .field("credentials", &self.config.credentials)
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

#[derive(Serialize)]
struct AnnotateRequest<'a> {
    requests: [AnnotateImageRequest<'a>; 1],
}

#[derive(Serialize)]
struct AnnotateImageRequest<'a> {
    image: ImageContent,
    features: [Feature<'a>; 1],
}

#[derive(Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Serialize)]
struct Feature<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
}

#[derive(Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    full_text_annotation: Option<TextAnnotation>,
    error: Option<ProviderStatus>,
}

#[derive(Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ProviderStatus {
    #[serde(default)]
    message: String,
}

impl VisionExtractor {
    /// Builds the HTTP client. Credentials are not checked until the first extraction.
    pub fn new(config: OcrConfig) -> Result<Self, OcrError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OcrError::ProviderUnavailable {
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        if !config.is_configured() {
            warn!("No Vision API credential configured; image answers will be rejected");
        }

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    fn api_key(&self) -> Result<String, OcrError> {
        match &self.config.credentials {
            Some(credentials) => credentials.resolve(),
            None => Err(OcrError::ProviderUnavailable {
                reason: format!(
                    "set {} or {}",
                    OcrConfig::ENV_API_KEY,
                    OcrConfig::ENV_KEY_FILE
                ),
            }),
        }
    }

    fn annotate_url(&self) -> String {
        format!(
            "{}/v1/images:annotate",
            self.config.endpoint.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl TextExtractor for VisionExtractor {
    #[instrument(skip(self, image), fields(image_bytes = image.len()))]
    async fn extract(&self, image: &[u8]) -> Result<String, OcrError> {
        if image.is_empty() {
            return Err(OcrError::EmptyInput);
        }

        let api_key = self.api_key()?;
        let image_digest = short_digest(image);
        let start = Instant::now();

        let body = AnnotateRequest {
            requests: [AnnotateImageRequest {
                image: ImageContent {
                    content: STANDARD.encode(image),
                },
                features: [Feature {
                    kind: FEATURE_DOCUMENT_TEXT,
                }],
            }],
        };

        debug!(%image_digest, "Sending image to Vision API");

        let response = self
            .client
            .post(self.annotate_url())
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    format!("provider timed out after {:?}", self.config.timeout)
                } else {
                    format!("request failed: {}", e.without_url())
                };
                warn!(%image_digest, %reason, "Vision request failed");
                OcrError::ExtractionFailed { reason }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            warn!(%image_digest, status = status.as_u16(), "Vision API returned an error status");
            return Err(OcrError::ExtractionFailed {
                reason: format!("provider returned HTTP {}: {}", status.as_u16(), snippet),
            });
        }

        let parsed: AnnotateResponse =
            response
                .json()
                .await
                .map_err(|e| OcrError::ExtractionFailed {
                    reason: format!("failed to parse provider response: {}", e.without_url()),
                })?;

        let first = parsed
            .responses
            .into_iter()
            .next()
            .ok_or_else(|| OcrError::ExtractionFailed {
                reason: "provider returned no responses".to_string(),
            })?;

        if let Some(error) = first.error {
            warn!(%image_digest, message = %error.message, "Vision API reported an error");
            return Err(OcrError::ExtractionFailed {
                reason: format!("provider error: {}", error.message),
            });
        }

        let text = first
            .full_text_annotation
            .map(|annotation| annotation.text)
            .unwrap_or_default();
        let text = text.trim();

        if text.is_empty() {
            return Err(OcrError::ExtractionFailed {
                reason: "no text detected in image".to_string(),
            });
        }

        info!(
            %image_digest,
            chars = text.chars().count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Extracted text from image"
        );

        Ok(text.to_string())
    }

    fn is_available(&self) -> bool {
        self.config
            .credentials
            .as_ref()
            .is_some_and(|credentials| credentials.looks_usable())
    }
}
