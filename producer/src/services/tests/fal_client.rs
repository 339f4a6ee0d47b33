//! Tests for FalQueueClient against a local mock server

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::error::{JobError, JobErrorClass};
use crate::services::fal_client::FalQueueClient;
use crate::traits::JobService;
use crate::types::{GenerationParams, JobStatus, PipelineConfig};

fn client_for(server: &MockServer) -> FalQueueClient {
    let config = PipelineConfig::default().with_queue_base(server.uri());
    FalQueueClient::new("test-key", &config)
}

#[tokio::test]
async fn test_submit_sends_payload_and_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fal-ai/nano-banana"))
        .and(header("Authorization", "Key test-key"))
        .and(body_json(json!({
            "prompt": "Chibi agent",
            "aspect_ratio": "1:1",
            "output_format": "png",
            "num_images": 1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "request_id": "req-1",
            "status_url": format!("{}/requests/req-1/status", server.uri()),
            "response_url": format!("{}/requests/req-1", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ticket = client_for(&server)
        .submit("Chibi agent", &GenerationParams::default())
        .await
        .unwrap();

    assert_eq!(ticket.request_id.as_deref(), Some("req-1"));
    assert!(ticket.status_url.ends_with("/requests/req-1/status"));
    assert!(ticket.response_url.ends_with("/requests/req-1"));
}

#[tokio::test]
async fn test_submit_without_urls_is_submission_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"request_id": "req-2"})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .submit("prompt", &GenerationParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, JobError::RemoteSubmission { .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_rejected_key_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .submit("prompt", &GenerationParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, JobError::Unauthorized { status: 401 }));
    assert_eq!(err.class(), JobErrorClass::Auth);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_poll_requests_logs_and_parses_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/requests/req-1/status"))
        .and(query_param("logs", "1"))
        .and(header("Authorization", "Key test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "FAILED", "error": "nsfw"})))
        .expect(1)
        .mount(&server)
        .await;

    let status = client_for(&server)
        .poll(&format!("{}/requests/req-1/status", server.uri()))
        .await
        .unwrap();
    assert_eq!(status, JobStatus::Failed { message: "nsfw".to_string() });
}

#[tokio::test]
async fn test_poll_server_error_is_transport() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .poll(&format!("{}/requests/x/status", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, JobError::Transport { .. }));
}

#[tokio::test]
async fn test_fetch_returns_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/requests/req-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"images": [{"url": "https://cdn/x.png"}]})))
        .mount(&server)
        .await;

    let payload = client_for(&server)
        .fetch(&format!("{}/requests/req-1", server.uri()))
        .await
        .unwrap();
    assert_eq!(payload["images"][0]["url"], "https://cdn/x.png");
}

#[tokio::test]
async fn test_download_bytes_and_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img/full.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/empty.png"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let bytes = client.download(&format!("{}/img/full.png", server.uri())).await.unwrap();
    assert_eq!(bytes, vec![1, 2, 3]);

    let err = client
        .download(&format!("{}/img/empty.png", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, JobError::Download { .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_download_forbidden_is_download_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img/signed.png"))
        .respond_with(ResponseTemplate::new(403).set_body_string("link expired"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .download(&format!("{}/img/signed.png", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, JobError::Download { .. }), "got {err:?}");
    assert!(err.to_string().contains("403"));
}
