//! HTTP client helpers for tests.

use std::time::Duration;

use papergrader::constants::STATUS_HEADER;
use papergrader::gateway::payload::{QuestionResponse, ScoreResponse, SubmissionResponse};
use papergrader::gateway::{ErrorResponse, HealthResponse, ReadyResponse};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

/// How an answer is submitted.
#[derive(Debug, Clone)]
pub enum Answer<'a> {
    Text(&'a str),
    Image(&'a [u8]),
}

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    fn with_answer(form: Form, text_field: &str, image_field: &str, answer: Answer<'_>) -> Form {
        match answer {
            Answer::Text(text) => form.text(text_field.to_string(), text.to_string()),
            Answer::Image(bytes) => form.part(
                image_field.to_string(),
                Part::bytes(bytes.to_vec())
                    .file_name("answer.png")
                    .mime_str("image/png")
                    .expect("valid mime"),
            ),
        }
    }

    async fn decode<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<(T, String), TestClientError> {
        let status_header = resp
            .headers()
            .get(STATUS_HEADER)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        if resp.status().is_success() {
            return Ok((resp.json().await?, status_header));
        }

        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(error) => Err(TestClientError::Api {
                status,
                kind: status_header,
                error,
            }),
            Err(_) => Err(TestClientError::UnexpectedStatus(status, body)),
        }
    }

    pub async fn create_question(
        &self,
        prompt: &str,
        model_answer: Answer<'_>,
    ) -> Result<QuestionResponse, TestClientError> {
        let form = Form::new().text("prompt", prompt.to_string());
        let form = Self::with_answer(form, "model_answer_text", "model_answer_image", model_answer);

        let resp = self
            .client
            .post(self.url("/v1/questions"))
            .multipart(form)
            .send()
            .await?;
        Self::decode(resp).await.map(|(body, _)| body)
    }

    pub async fn get_question(&self, id: u64) -> Result<QuestionResponse, TestClientError> {
        let resp = self
            .client
            .get(self.url(&format!("/v1/questions/{}", id)))
            .send()
            .await?;
        Self::decode(resp).await.map(|(body, _)| body)
    }

    /// Returns the score and the status header.
    pub async fn score(
        &self,
        question_id: u64,
        student_name: &str,
        answer: Answer<'_>,
    ) -> Result<(ScoreResponse, String), TestClientError> {
        let form = Form::new().text("student_name", student_name.to_string());
        let form = Self::with_answer(form, "student_answer_text", "student_answer_image", answer);

        let resp = self
            .client
            .post(self.url(&format!("/v1/questions/{}/score", question_id)))
            .multipart(form)
            .send()
            .await?;
        Self::decode(resp).await
    }

    pub async fn submissions(
        &self,
        question_id: u64,
    ) -> Result<Vec<SubmissionResponse>, TestClientError> {
        let resp = self
            .client
            .get(self.url(&format!("/v1/questions/{}/submissions", question_id)))
            .send()
            .await?;
        Self::decode(resp).await.map(|(body, _)| body)
    }

    pub async fn health(&self) -> Result<HealthResponse, TestClientError> {
        let resp = self.client.get(self.url("/healthz")).send().await?;
        Self::decode(resp).await.map(|(body, _)| body)
    }

    /// Returns the HTTP status alongside the body, since `pending` comes back as 503.
    pub async fn ready(&self) -> Result<(u16, ReadyResponse), TestClientError> {
        let resp = self.client.get(self.url("/ready")).send().await?;
        let status = resp.status().as_u16();
        Ok((status, resp.json().await?))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0} - Body: {1}")]
    UnexpectedStatus(u16, String),

    #[error("API error {status} ({kind}): {}", error.error)]
    Api {
        status: u16,
        kind: String,
        error: ErrorResponse,
    },
}

impl TestClientError {
    /// `(status, X-Papergrader-Status)` for API errors.
    pub fn api_status(&self) -> Option<(u16, &str)> {
        match self {
            TestClientError::Api { status, kind, .. } => Some((*status, kind.as_str())),
            _ => None,
        }
    }
}
