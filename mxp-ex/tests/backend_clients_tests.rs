//! HTTP client tests against in-process fake backends
//!
//! Each test spins up a small axum server on an ephemeral port standing in
//! for the generation backend, the analyzer, or the scanner.

use axum::{http::StatusCode, routing::post, Json, Router};
use mxp_common::{MediaKind, VerdictLabel};
use mxp_ex::services::{
    AnalyzerError, ChatCompletionsGenerator, GenerationFailure, GeneratorConfig,
    HttpMediaAnalyzer, HttpVerdictSource, MediaAnalyzer, NarrativeGenerator, VerdictSource,
};
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;
use tokio::net::TcpListener;

/// Serve `app` on 127.0.0.1 and return its base URL
async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn generator(base_url: String, timeout: Duration) -> ChatCompletionsGenerator {
    ChatCompletionsGenerator::new(GeneratorConfig {
        base_url,
        model: "test-model".to_string(),
        temperature: 0.3,
        timeout,
    })
    .unwrap()
}

#[tokio::test]
async fn test_generator_returns_first_choice_content() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|Json(body): Json<Value>| async move {
            let prompt = body["messages"][0]["content"].as_str().unwrap_or_default().to_string();
            let model = body["model"].as_str().unwrap_or_default().to_string();
            Json(json!({
                "choices": [
                    {"message": {"role": "assistant", "content": format!("{} says: {}", model, prompt)}},
                    {"message": {"role": "assistant", "content": "second"}}
                ]
            }))
        }),
    );
    let base = spawn(app).await;

    let text = generator(format!("{}/v1", base), Duration::from_secs(5))
        .generate("hello")
        .await
        .unwrap();
    assert_eq!(text, "test-model says: hello");
}

#[tokio::test]
async fn test_generator_non_success_is_backend_failure() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model not loaded") }),
    );
    let base = spawn(app).await;

    let err = generator(format!("{}/v1", base), Duration::from_secs(5))
        .generate("hello")
        .await
        .unwrap_err();
    match err {
        GenerationFailure::Backend { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "model not loaded");
        }
        other => panic!("expected Backend, got {:?}", other),
    }
}

#[tokio::test]
async fn test_generator_missing_choices_is_malformed() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { Json(json!({"choices": []})) }),
    );
    let base = spawn(app).await;

    let err = generator(format!("{}/v1", base), Duration::from_secs(5))
        .generate("hello")
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationFailure::MalformedResponse(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_generator_non_json_is_malformed() {
    let app = Router::new().route("/v1/chat/completions", post(|| async { "not json" }));
    let base = spawn(app).await;

    let err = generator(format!("{}/v1", base), Duration::from_secs(5))
        .generate("hello")
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationFailure::MalformedResponse(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_generator_slow_backend_times_out() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"choices": [{"message": {"content": "late"}}]}))
        }),
    );
    let base = spawn(app).await;

    let err = generator(format!("{}/v1", base), Duration::from_millis(200))
        .generate("hello")
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationFailure::Timeout(_)), "got {:?}", err);
    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn test_analyzer_forwards_path_and_kind() {
    let app = Router::new().route(
        "/analyze",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["type"], "image");
            assert_eq!(body["path"], "/srv/media/cow.png");
            Json(json!({
                "metadata": {"type": "image", "width": 640, "height": 480},
                "metrics": {"edge_density": 0.05, "color_variance": 4000.0}
            }))
        }),
    );
    let base = spawn(app).await;

    let analyzer =
        HttpMediaAnalyzer::new(format!("{}/analyze", base), Duration::from_secs(5)).unwrap();
    let result = analyzer
        .analyze(Path::new("/srv/media/cow.png"), MediaKind::Image)
        .await
        .unwrap();

    assert_eq!(result.kind(), MediaKind::Image);
    assert_eq!(result.metrics.len(), 2);
    assert_eq!(result.metric_or_zero("edge_density"), 0.05);
}

#[tokio::test]
async fn test_analyzer_415_is_unsupported_media_type() {
    let app = Router::new().route(
        "/analyze",
        post(|| async { (StatusCode::UNSUPPORTED_MEDIA_TYPE, "cannot decode") }),
    );
    let base = spawn(app).await;

    let analyzer =
        HttpMediaAnalyzer::new(format!("{}/analyze", base), Duration::from_secs(5)).unwrap();
    let err = analyzer
        .analyze(Path::new("/tmp/x.mp4"), MediaKind::Video)
        .await
        .unwrap_err();
    assert!(matches!(err, AnalyzerError::UnsupportedMediaType(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_analyzer_garbage_is_parse_error() {
    let app = Router::new().route("/analyze", post(|| async { Json(json!({"metrics": 3})) }));
    let base = spawn(app).await;

    let analyzer =
        HttpMediaAnalyzer::new(format!("{}/analyze", base), Duration::from_secs(5)).unwrap();
    let err = analyzer
        .analyze(Path::new("/tmp/x.png"), MediaKind::Image)
        .await
        .unwrap_err();
    assert!(matches!(err, AnalyzerError::Parse(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_scanner_verdict_mapping() {
    let app = Router::new().route(
        "/scan",
        post(|| async { Json(json!({"ai_detected": true, "ai_confidence": 0.91})) }),
    );
    let base = spawn(app).await;

    let scanner = HttpVerdictSource::new(format!("{}/scan", base), Duration::from_secs(5)).unwrap();
    let analysis = mxp_common::AnalysisResult::new(
        mxp_common::MediaMetadata::Image {
            width: 1,
            height: 1,
        },
        Default::default(),
    );
    let verdict = scanner
        .determine(Path::new("/tmp/x.png"), &analysis)
        .await
        .unwrap();

    assert_eq!(verdict.label, VerdictLabel::AiGenerated);
    assert!((verdict.confidence - 0.91).abs() < 1e-9);
}

#[tokio::test]
async fn test_scanner_error_status_is_backend_error() {
    let app = Router::new().route(
        "/scan",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "busy") }),
    );
    let base = spawn(app).await;

    let scanner = HttpVerdictSource::new(format!("{}/scan", base), Duration::from_secs(5)).unwrap();
    let analysis = mxp_common::AnalysisResult::new(
        mxp_common::MediaMetadata::Image {
            width: 1,
            height: 1,
        },
        Default::default(),
    );
    let err = scanner
        .determine(Path::new("/tmp/x.png"), &analysis)
        .await
        .unwrap_err();
    assert!(matches!(err, AnalyzerError::Backend { status: 503, .. }), "got {:?}", err);
}
