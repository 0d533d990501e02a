//! In-process stand-in for the Cloud Vision `images:annotate` endpoint.
//!
//! "Reads" an image by decoding its base64 content and returning the bytes as text, so tests
//! can upload the answer they want OCR to see.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{Json, Router, extract::State, http::HeaderMap, http::StatusCode, routing::post};
use base64::Engine;
use papergrader::ocr::{OcrConfig, VisionCredentials, VisionExtractor};
use serde_json::{Value, json};

pub const FAKE_API_KEY: &str = "integration-key";

#[derive(Clone, Default)]
pub struct FakeVision {
    pub endpoint: String,
    requests: Arc<AtomicUsize>,
}

impl FakeVision {
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn extractor(&self) -> VisionExtractor {
        let config = OcrConfig::default()
            .with_endpoint(self.endpoint.clone())
            .with_credentials(VisionCredentials::ApiKey(FAKE_API_KEY.to_string()))
            .with_timeout(Duration::from_secs(2));
        VisionExtractor::new(config).unwrap()
    }
}

async fn annotate(
    State(requests): State<Arc<AtomicUsize>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    requests.fetch_add(1, Ordering::SeqCst);

    if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some(FAKE_API_KEY) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": { "code": 403, "message": "API key not valid." } })),
        );
    }

    let content = body["requests"][0]["image"]["content"]
        .as_str()
        .unwrap_or_default();
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(content)
        .unwrap_or_default();
    let text = String::from_utf8_lossy(&decoded).to_string();

    let reply = if text.trim().is_empty() {
        json!({ "responses": [ {} ] })
    } else {
        json!({ "responses": [ { "fullTextAnnotation": { "text": text } } ] })
    };

    (StatusCode::OK, Json(reply))
}

pub async fn spawn_fake_vision() -> FakeVision {
    let requests = Arc::new(AtomicUsize::new(0));

    let app = Router::new()
        .route("/v1/images:annotate", post(annotate))
        .with_state(Arc::clone(&requests));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeVision {
        endpoint: format!("http://{}", addr),
        requests,
    }
}
