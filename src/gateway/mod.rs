//! HTTP gateway (Axum) for question authoring and answer grading.
//!
//! All grading routes take `multipart/form-data` so answers can be typed or uploaded as
//! images. Errors come back as `{ error, code }` JSON with an `X-Papergrader-Status` header.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::{ErrorResponse, GatewayError};
pub use handler::{
    create_question_handler, get_question_handler, list_submissions_handler, score_handler,
};
pub use state::HandlerState;

use crate::constants::{STATUS_HEADER, STATUS_HEALTHY, STATUS_PENDING, STATUS_READY};
use crate::embedding::Embedder;
use crate::ocr::TextExtractor;

pub fn create_router_with_state<E, X>(state: HandlerState<E, X>) -> Router
where
    E: Embedder + 'static,
    X: TextExtractor + 'static,
{
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler::<E, X>))
        .route("/v1/questions", post(create_question_handler::<E, X>))
        .route("/v1/questions/{id}", get(get_question_handler::<E, X>))
        .route("/v1/questions/{id}/score", post(score_handler::<E, X>))
        .route(
            "/v1/questions/{id}/submissions",
            get(list_submissions_handler::<E, X>),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct ReadyResponse {
    pub status: String,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct ComponentStatus {
    pub http: String,
    /// `ready` once the model is loaded, `pending` before.
    pub embedding: String,
    /// `stub` or `model`.
    pub embedder_mode: String,
    pub embedding_model: String,
    /// `configured` or `unconfigured`. OCR is optional and never blocks readiness.
    pub ocr: String,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(STATUS_HEADER, HeaderValue::from_static(STATUS_HEALTHY));

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse {
            status: "ok".to_string(),
        }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler<E, X>(State(state): State<HandlerState<E, X>>) -> Response
where
    E: Embedder + 'static,
    X: TextExtractor + 'static,
{
    let embedder = state.pipeline.embedder();
    let embedding_ready = embedder.is_ready();

    let components = ComponentStatus {
        http: STATUS_READY.to_string(),
        embedding: if embedding_ready {
            STATUS_READY
        } else {
            STATUS_PENDING
        }
        .to_string(),
        embedder_mode: if embedder.is_stub() { "stub" } else { "model" }.to_string(),
        embedding_model: embedder.model_id().to_string(),
        ocr: if state.pipeline.extractor().is_available() {
            "configured"
        } else {
            "unconfigured"
        }
        .to_string(),
    };

    let (status_code, status_msg) = if embedding_ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, STATUS_PENDING)
    };

    let mut headers = HeaderMap::new();
    headers.insert(STATUS_HEADER, HeaderValue::from_static(status_msg));

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg.to_string(),
            components,
        }),
    )
        .into_response()
}
