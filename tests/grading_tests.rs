//! Library-level grading tests using the public API and the `mock` feature.

use std::sync::Arc;

use papergrader::embedding::{Embedder, LazyEmbedder, SentenceConfig};
use papergrader::grading::{AnswerSource, GradingError, GradingPipeline, Question};
use papergrader::ocr::{OcrError, StaticTextExtractor};
use papergrader::storage::{MemoryStore, NewSubmission};

const MODEL_ANSWER: &str = "Photosynthesis converts light energy into chemical energy in plants";

fn pipeline(extractor: StaticTextExtractor) -> GradingPipeline<LazyEmbedder, StaticTextExtractor> {
    GradingPipeline::new(
        Arc::new(LazyEmbedder::new(SentenceConfig::stub())),
        Arc::new(extractor),
    )
}

fn question() -> Question {
    Question {
        id: 1,
        prompt: "Describe photosynthesis".to_string(),
        model_answer_text: MODEL_ANSWER.to_string(),
    }
}

#[tokio::test]
async fn test_scores_rank_answers_by_overlap() {
    let pipeline = pipeline(StaticTextExtractor::unavailable());
    let question = question();

    let mut scores = Vec::new();
    for answer in [
        "Photosynthesis converts light energy into chemical energy in plants",
        "Plants turn light energy into chemical energy",
        "Plants need water",
        "The French revolution began in 1789",
    ] {
        let result = pipeline
            .grade(&question, AnswerSource::Text(answer.to_string()))
            .await
            .unwrap();
        assert!((0.0..=1.0).contains(&result.similarity_score));
        scores.push(result.similarity_score);
    }

    assert!(scores[0] > 0.99);
    assert!(scores.windows(2).all(|w| w[0] >= w[1]), "{:?}", scores);
    assert_eq!(scores[3], 0.0);
}

#[tokio::test]
async fn test_concurrent_grading_loads_model_once() {
    let pipeline = pipeline(StaticTextExtractor::returning("chemical energy from light"));
    let question = Arc::new(question());
    assert!(!pipeline.embedder().is_ready());

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let pipeline = pipeline.clone();
            let question = Arc::clone(&question);
            tokio::spawn(async move {
                let source = if i % 2 == 0 {
                    AnswerSource::Text("chemical energy from light".to_string())
                } else {
                    AnswerSource::Image(b"page".to_vec())
                };
                pipeline.grade(&question, source).await.unwrap()
            })
        })
        .collect();

    let mut scores = Vec::new();
    for task in tasks {
        scores.push(task.await.unwrap().similarity_score);
    }

    assert!(pipeline.embedder().is_ready());
    assert!(scores.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(pipeline.extractor().calls(), 8);
}

#[tokio::test]
async fn test_ocr_failures_surface_as_grading_errors() {
    let question = question();

    let unavailable = pipeline(StaticTextExtractor::unavailable());
    let err = unavailable
        .grade(&question, AnswerSource::Image(b"scan".to_vec()))
        .await
        .unwrap_err();
    assert!(matches!(err, GradingError::ProviderUnavailable { .. }));

    let failing = pipeline(StaticTextExtractor::failing(OcrError::ExtractionFailed {
        reason: "no text detected in image".to_string(),
    }));
    let err = failing
        .grade(&question, AnswerSource::Image(b"scan".to_vec()))
        .await
        .unwrap_err();
    assert!(matches!(err, GradingError::ExtractionFailed { .. }));
    assert!(err.to_string().contains("no text detected"));
}

#[tokio::test]
async fn test_graded_submissions_are_recorded_in_order() {
    let pipeline = pipeline(StaticTextExtractor::unavailable());
    let store = MemoryStore::new();
    let question = store
        .create_question("Describe photosynthesis".to_string(), MODEL_ANSWER.to_string())
        .unwrap();

    for (name, answer) in [("Ana", "light energy"), ("Ben", "chemical energy in plants")] {
        let result = pipeline
            .grade(&question, AnswerSource::Text(answer.to_string()))
            .await
            .unwrap();
        store
            .record_submission(NewSubmission {
                question_id: question.id,
                student_name: name.to_string(),
                student_answer_text: result.resolved_student_answer,
                similarity_score: result.similarity_score,
            })
            .unwrap();
    }

    let submissions = store.list_submissions(question.id).unwrap();
    assert_eq!(submissions.len(), 2);
    assert_eq!(submissions[0].student_name, "Ana");
    assert_eq!(submissions[1].student_answer_text, "chemical energy in plants");
    assert!(submissions[0].created_at <= submissions[1].created_at);
}
