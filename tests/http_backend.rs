//! HTTP backend tests against a local mock server.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use coderefine::api::{ApiError, Backend, HttpBackend};
use coderefine::models::github::{AnalyzeRequest, ValidateTokenRequest};
use coderefine::models::review::{ReviewRequest, Severity};
use coderefine::models::rewrite::RewriteRequest;

async fn backend_for(server: &MockServer) -> HttpBackend {
    HttpBackend::new(format!("{}/api/", server.uri())).unwrap()
}

#[tokio::test]
async fn review_posts_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/review"))
        .and(body_json(json!({
            "code": "print(1)",
            "language": "python",
            "focus_areas": ["security"],
            "calculate_score": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "quality_scores": {"overall": 91.6, "grade": "a", "categories": {"security": 100}},
            "critical": [],
            "summary": "ok"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server).await;
    let result = backend
        .review(&ReviewRequest {
            code: "print(1)".to_string(),
            language: "python".to_string(),
            focus_areas: vec!["security".to_string()],
            calculate_score: true,
        })
        .await
        .unwrap();

    let scores = result.quality_scores.as_ref().unwrap();
    assert_eq!(scores.overall, 92);
    assert_eq!(scores.grade.to_string(), "A");
    assert_eq!(result.count(Severity::Critical), 0);
    assert_eq!(result.summary.as_deref(), Some("ok"));
}

#[tokio::test]
async fn review_text_accepts_legacy_field_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/review"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"review": "## Notes"})))
        .mount(&server)
        .await;

    let result = backend_for(&server)
        .await
        .review(&ReviewRequest {
            code: "x".to_string(),
            language: "python".to_string(),
            focus_areas: Vec::new(),
            calculate_score: true,
        })
        .await
        .unwrap();

    assert_eq!(result.raw_review.as_deref(), Some("## Notes"));
    assert!(result.quality_scores.is_none());
}

#[tokio::test]
async fn error_detail_is_carried_into_the_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/rewrite"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "detail": {"error": "llm_down", "user_message": "Model is warming up."}
        })))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .await
        .rewrite(&RewriteRequest {
            code: "x".to_string(),
            language: "rust".to_string(),
            focus_areas: Vec::new(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Status { status: 503, .. }));
    assert_eq!(err.user_message(), "Model is warming up.");
}

#[tokio::test]
async fn non_json_error_body_falls_back_to_status_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/github-simple/validate-token"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .await
        .validate_token(&ValidateTokenRequest {
            github_token: "ghp_x".to_string(),
        })
        .await
        .unwrap_err();

    match err {
        ApiError::Status { ref detail, .. } => assert!(detail.is_none()),
        ref other => panic!("expected a status error, got {other:?}"),
    }
    assert_eq!(err.user_message(), "Bad Gateway");
}

#[tokio::test]
async fn installations_use_get() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/github/installations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "installations": [{"id": 7, "account": "acme", "type": "Organization"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let list = backend_for(&server).await.installations().await.unwrap();

    assert_eq!(list.installations.len(), 1);
    assert_eq!(list.installations[0].kind, "Organization");
    assert_eq!(list.installations[0].id, Some(7));
}

#[tokio::test]
async fn analyze_posts_pr_arguments() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/github-simple/analyze-pr"))
        .and(body_json(json!({
            "pr_url": "https://github.com/o/r/pull/3",
            "github_token": "ghp_x",
            "post_comment": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "pr_info": {"pr_number": 3, "title": "Fix", "author": "dev"},
            "review_results": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = backend_for(&server)
        .await
        .analyze_pr(&AnalyzeRequest {
            pr_url: "https://github.com/o/r/pull/3".to_string(),
            github_token: "ghp_x".to_string(),
            post_comment: false,
        })
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.pr_info.pr_number, 3);
    assert!(!result.comment_posted);
}

#[tokio::test]
async fn bumble_launch_posts_empty_object() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/bumble/launch"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "started"})))
        .expect(1)
        .mount(&server)
        .await;

    let launch = backend_for(&server).await.launch_bumble().await.unwrap();

    assert!(launch.success);
    assert_eq!(launch.message.as_deref(), Some("started"));
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .await
        .chat(&coderefine::models::chat::ChatRequest {
            message: "hi".to_string(),
            language: "python".to_string(),
            context_code: String::new(),
            review_summary: String::new(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));
}
