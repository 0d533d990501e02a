use axum::{
    Json,
    extract::{multipart::MultipartRejection, rejection::PathRejection},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::warn;

use crate::constants::STATUS_HEADER;
use crate::grading::GradingError;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("upload too large: {0}")]
    PayloadTooLarge(String),

    #[error(transparent)]
    Grading(#[from] GradingError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<PathRejection> for GatewayError {
    fn from(rejection: PathRejection) -> Self {
        GatewayError::InvalidRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for GatewayError {
    fn from(rejection: MultipartRejection) -> Self {
        GatewayError::InvalidRequest(rejection.body_text())
    }
}

impl GatewayError {
    /// HTTP status and the short kind reported in the status header.
    pub fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            GatewayError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large"),
            GatewayError::Grading(err) => match err {
                GradingError::MissingAnswer => (StatusCode::BAD_REQUEST, "missing_answer"),
                GradingError::ConflictingAnswerSources => {
                    (StatusCode::BAD_REQUEST, "conflicting_answer_sources")
                }
                GradingError::EmptyInput => (StatusCode::BAD_REQUEST, "empty_input"),
                GradingError::ProviderUnavailable { .. } => {
                    (StatusCode::SERVICE_UNAVAILABLE, "provider_unavailable")
                }
                GradingError::ExtractionFailed { .. } => {
                    (StatusCode::BAD_GATEWAY, "extraction_failed")
                }
                GradingError::Embedding(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "embedding_error")
                }
            },
            GatewayError::Storage(err) => match err {
                StorageError::QuestionNotFound { .. } => {
                    (StatusCode::NOT_FOUND, "question_not_found")
                }
                StorageError::EmptyModelAnswer => (StatusCode::BAD_REQUEST, "empty_model_answer"),
            },
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, kind) = self.classify();

        if status.is_server_error() {
            warn!(error = %self, kind, "Request failed");
        }

        let mut headers = HeaderMap::new();
        headers.insert(STATUS_HEADER, HeaderValue::from_static(kind));

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
