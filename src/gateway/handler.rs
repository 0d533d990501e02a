use std::collections::HashMap;

use axum::{
    Json,
    extract::{
        Multipart, Path, State,
        multipart::{MultipartError, MultipartRejection},
        rejection::PathRejection,
    },
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, info, instrument};

use crate::constants::{STATUS_CREATED, STATUS_GRADED, STATUS_HEADER};
use crate::embedding::Embedder;
use crate::gateway::error::GatewayError;
use crate::gateway::payload::{QuestionResponse, ScoreResponse, SubmissionResponse};
use crate::gateway::state::HandlerState;
use crate::grading::AnswerSource;
use crate::ocr::TextExtractor;
use crate::storage::NewSubmission;

pub const FIELD_PROMPT: &str = "prompt";
pub const FIELD_MODEL_ANSWER_TEXT: &str = "model_answer_text";
pub const FIELD_MODEL_ANSWER_IMAGE: &str = "model_answer_image";
pub const FIELD_STUDENT_NAME: &str = "student_name";
pub const FIELD_STUDENT_ANSWER_TEXT: &str = "student_answer_text";
pub const FIELD_STUDENT_ANSWER_IMAGE: &str = "student_answer_image";

/// Named multipart parts, buffered in memory.
#[derive(Debug, Default)]
pub struct FormFields {
    parts: HashMap<String, Vec<u8>>,
}

impl FormFields {
    /// Drains the multipart stream. Unnamed parts are skipped; a repeated name is rejected.
    pub async fn read(mut multipart: Multipart) -> Result<Self, GatewayError> {
        let mut parts = HashMap::new();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let bytes = field.bytes().await.map_err(multipart_error)?;

            if parts.insert(name.clone(), bytes.to_vec()).is_some() {
                return Err(GatewayError::InvalidRequest(format!(
                    "field `{}` given more than once",
                    name
                )));
            }
        }

        Ok(Self { parts })
    }

    /// Removes a part and decodes it as UTF-8.
    pub fn take_text(&mut self, name: &str) -> Result<Option<String>, GatewayError> {
        self.parts
            .remove(name)
            .map(|bytes| {
                String::from_utf8(bytes).map_err(|_| {
                    GatewayError::InvalidRequest(format!("field `{}` is not valid UTF-8", name))
                })
            })
            .transpose()
    }

    pub fn take_bytes(&mut self, name: &str) -> Option<Vec<u8>> {
        self.parts.remove(name)
    }

    /// A text part that must be present with non-whitespace content. Returned trimmed.
    pub fn require_text(&mut self, name: &str) -> Result<String, GatewayError> {
        match self.take_text(name)? {
            Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
            _ => Err(GatewayError::InvalidRequest(format!(
                "field `{}` is required",
                name
            ))),
        }
    }

    /// Builds the answer source from a text/image field pair.
    pub fn take_answer(
        &mut self,
        text_field: &str,
        image_field: &str,
    ) -> Result<AnswerSource, GatewayError> {
        let text = self.take_text(text_field)?;
        let image = self.take_bytes(image_field);
        Ok(AnswerSource::from_parts(text, image)?)
    }
}

fn multipart_error(err: MultipartError) -> GatewayError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        GatewayError::PayloadTooLarge(err.body_text())
    } else {
        GatewayError::InvalidRequest(format!("malformed multipart body: {}", err.body_text()))
    }
}

fn with_status(status: StatusCode, kind: &'static str, body: impl IntoResponse) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(STATUS_HEADER, HeaderValue::from_static(kind));
    (status, headers, body).into_response()
}

/// `POST /v1/questions`: stores a question; an image model answer is read through OCR.
#[instrument(skip(state, multipart))]
pub async fn create_question_handler<E, X>(
    State(state): State<HandlerState<E, X>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, GatewayError>
where
    E: Embedder + 'static,
    X: TextExtractor + 'static,
{
    let mut form = FormFields::read(multipart?).await?;
    let prompt = form.require_text(FIELD_PROMPT)?;
    let source = form.take_answer(FIELD_MODEL_ANSWER_TEXT, FIELD_MODEL_ANSWER_IMAGE)?;
    debug!(source = source.kind(), "Creating question");

    let model_answer = state.pipeline.resolve_answer(source).await?;
    let question = state.store.create_question(prompt, model_answer)?;

    info!(question_id = question.id, "Question created");

    Ok(with_status(
        StatusCode::CREATED,
        STATUS_CREATED,
        Json(QuestionResponse::from(question)),
    ))
}

/// `GET /v1/questions/{id}`.
#[instrument(skip(state))]
pub async fn get_question_handler<E, X>(
    State(state): State<HandlerState<E, X>>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<QuestionResponse>, GatewayError>
where
    E: Embedder + 'static,
    X: TextExtractor + 'static,
{
    let Path(id) = id?;
    let question = state.store.get_question(id)?;
    Ok(Json(question.into()))
}

/// `POST /v1/questions/{id}/score`: grades one answer and records it as a submission.
#[instrument(skip(state, multipart), fields(similarity = tracing::field::Empty))]
pub async fn score_handler<E, X>(
    State(state): State<HandlerState<E, X>>,
    id: Result<Path<u64>, PathRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, GatewayError>
where
    E: Embedder + 'static,
    X: TextExtractor + 'static,
{
    let Path(id) = id?;
    let mut form = FormFields::read(multipart?).await?;
    let question = state.store.get_question(id)?;
    let student_name = form.require_text(FIELD_STUDENT_NAME)?;
    let source = form.take_answer(FIELD_STUDENT_ANSWER_TEXT, FIELD_STUDENT_ANSWER_IMAGE)?;

    let result = state.pipeline.grade(&question, source).await?;
    tracing::Span::current().record("similarity", result.similarity_score);

    let submission = state.store.record_submission(NewSubmission {
        question_id: question.id,
        student_name,
        student_answer_text: result.resolved_student_answer.clone(),
        similarity_score: result.similarity_score,
    })?;

    info!(
        question_id = question.id,
        submission_id = submission.id,
        similarity = result.similarity_score,
        "Submission graded"
    );

    Ok(with_status(
        StatusCode::OK,
        STATUS_GRADED,
        Json(ScoreResponse::new(&question, result)),
    ))
}

/// `GET /v1/questions/{id}/submissions`, oldest first.
#[instrument(skip(state))]
pub async fn list_submissions_handler<E, X>(
    State(state): State<HandlerState<E, X>>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Vec<SubmissionResponse>>, GatewayError>
where
    E: Embedder + 'static,
    X: TextExtractor + 'static,
{
    let Path(id) = id?;
    let submissions = state.store.list_submissions(id)?;
    Ok(Json(
        submissions
            .into_iter()
            .map(SubmissionResponse::from)
            .collect(),
    ))
}
