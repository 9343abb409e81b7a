//! n8n webhook listener tests against a mock HTTP server.

use std::sync::Arc;

use anno_models::{GenerationRequest, VideoJob};
use anno_pipeline::{JobEventBus, JobListener, N8nClient, N8nJobListener};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completed_job() -> VideoJob {
    let mut job = VideoJob::new(
        1,
        &GenerationRequest {
            prompt: "a cat riding a bike".into(),
            title: "Cat Bike".into(),
            description: "A short clip".into(),
            targets: "instagram,tiktok".into(),
            style: None,
        },
    );
    job.mark_completed("https://cdn.example.com/cat.mp4", 10, 20);
    job
}

#[tokio::test]
async fn test_completed_job_is_posted_to_webhook() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook/video-ready"))
        .and(body_partial_json(serde_json::json!({
            "title": "Cat Bike",
            "description": "A short clip",
            "blobUrl": "https://cdn.example.com/cat.mp4",
            "targets": ["instagram", "tiktok"],
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = N8nClient::new(format!("{}/webhook/video-ready", server.uri())).unwrap();
    let listener = N8nJobListener::new(client);
    listener.on_completed(&completed_job()).await.unwrap();
}

#[tokio::test]
async fn test_job_without_url_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = N8nClient::new(format!("{}/webhook/video-ready", server.uri())).unwrap();
    let listener = N8nJobListener::new(client);

    let mut job = completed_job();
    job.video_url = None;
    listener.on_completed(&job).await.unwrap();
}

#[tokio::test]
async fn test_webhook_error_does_not_escape_the_bus() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = N8nClient::new(server.uri()).unwrap();
    let bus = JobEventBus::new(vec![
        Arc::new(N8nJobListener::new(client)) as Arc<dyn JobListener>
    ]);

    // Must not panic or propagate the 500.
    bus.notify_completed(&completed_job()).await;
}
