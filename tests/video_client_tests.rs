//! Mock HTTP tests for VideoClient.
//!
//! These tests cover:
//! - Job creation request format (multipart fields, auth header)
//! - Status retrieval and record parsing
//! - Error responses
//! - Streaming download of the rendered video

use std::path::PathBuf;
use std::time::Duration;

use serde_json::json;
use sora_gen::size::VideoSize;
use sora_gen::video::{
    ContentDownloader, CreateVideo, Downloader, Job, JobStatus, VideoClient, VideoError,
    VideoService,
};
use wiremock::matchers::{header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> VideoClient {
    VideoClient::with_base_url("test-key".to_string(), format!("{}/v1", server.uri())).unwrap()
}

fn create_request(reference: Option<PathBuf>) -> CreateVideo<'static> {
    CreateVideo {
        model: "sora-2",
        prompt: "a paper boat in the rain",
        size: VideoSize::new(720, 1280),
        seconds: 4,
        input_reference: reference,
    }
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[tokio::test]
async fn test_create_video_sends_multipart_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/videos"))
        .and(header("Authorization", "Bearer test-key"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "video_123",
            "object": "video",
            "status": "queued"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let job = client.create_video(&create_request(None)).await.unwrap();

    assert_eq!(job.id, "video_123");
    assert_eq!(job.status.as_deref(), Some("queued"));
    assert_eq!(job.extra.get("object"), Some(&json!("video")));

    let requests = mock_server.received_requests().await.unwrap();
    let body = &requests[0].body;
    assert!(contains_bytes(body, b"name=\"model\""));
    assert!(contains_bytes(body, b"sora-2"));
    assert!(contains_bytes(body, b"name=\"prompt\""));
    assert!(contains_bytes(body, b"a paper boat in the rain"));
    assert!(contains_bytes(body, b"name=\"size\""));
    assert!(contains_bytes(body, b"720x1280"));
    assert!(contains_bytes(body, b"name=\"seconds\""));
    assert!(!contains_bytes(body, b"input_reference"));
}

#[tokio::test]
async fn test_create_video_attaches_reference_file() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/videos"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "video_ref", "status": "queued"})),
        )
        .mount(&mock_server)
        .await;

    let temp = tempfile::tempdir().unwrap();
    let reference = temp.path().join("cat_720x1280.png");
    std::fs::write(&reference, b"PNGDATA-123").unwrap();

    let client = client_for(&mock_server);
    let job = client
        .create_video(&create_request(Some(reference)))
        .await
        .unwrap();
    assert_eq!(job.id, "video_ref");

    let requests = mock_server.received_requests().await.unwrap();
    let body = &requests[0].body;
    assert!(contains_bytes(body, b"name=\"input_reference\""));
    assert!(contains_bytes(body, b"filename=\"cat_720x1280.png\""));
    assert!(contains_bytes(body, b"image/png"));
    assert!(contains_bytes(body, b"PNGDATA-123"));
}

#[tokio::test]
async fn test_create_video_missing_reference_file_is_io_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "x"})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client
        .create_video(&create_request(Some(PathBuf::from("/nonexistent/ref.png"))))
        .await;

    assert!(matches!(result, Err(VideoError::IoError(_))));
}

#[tokio::test]
async fn test_create_video_surfaces_api_error_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/videos"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "message": "Invalid value for size",
                "type": "invalid_request_error"
            }
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.create_video(&create_request(None)).await;

    match result {
        Err(VideoError::ApiError(message)) => {
            assert!(message.contains("400"));
            assert!(message.contains("Invalid value for size"));
            assert!(!message.contains("invalid_request_error"));
        }
        other => panic!("Expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_video_non_json_error_keeps_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/videos"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream unavailable"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.create_video(&create_request(None)).await;

    match result {
        Err(VideoError::ApiError(message)) => {
            assert!(message.contains("502"));
            assert!(message.contains("upstream unavailable"));
        }
        other => panic!("Expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_retrieve_video_parses_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/videos/video_123"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "video_123",
            "status": "completed",
            "progress": 100,
            "size": "720x1280"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let job = client.retrieve("video_123").await.unwrap();

    assert_eq!(job.id, "video_123");
    assert_eq!(job.classify(), JobStatus::Succeeded);
    assert_eq!(job.extra.get("progress"), Some(&json!(100)));
}

#[tokio::test]
async fn test_retrieve_video_without_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/videos/video_456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "video_456"})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let job = client.retrieve_video("video_456").await.unwrap();

    assert!(job.status.is_none());
    assert_eq!(job.classify(), JobStatus::Waiting);
}

#[tokio::test]
async fn test_retrieve_video_handles_404() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/videos/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"message": "Video not found"}
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.retrieve_video("missing").await;

    match result {
        Err(VideoError::ApiError(message)) => {
            assert!(message.starts_with("Status check failed"));
            assert!(message.contains("Video not found"));
        }
        other => panic!("Expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_download_content_writes_file() {
    let mock_server = MockServer::start().await;
    let video_bytes = vec![0u8, 1, 2, 3, 0xff, 0xfe, 42];

    Mock::given(method("GET"))
        .and(path("/v1/videos/video_123/content"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(video_bytes.clone())
                .insert_header("content-type", "video/mp4"),
        )
        .mount(&mock_server)
        .await;

    let temp = tempfile::tempdir().unwrap();
    let dest = temp.path().join("nested").join("video_123.mp4");

    let client = client_for(&mock_server);
    let path = client.download_content("video_123", &dest).await.unwrap();

    assert_eq!(path, dest);
    assert_eq!(std::fs::read(&dest).unwrap(), video_bytes);
    assert!(!temp.path().join("nested").join("video_123.mp4.part").exists());
}

#[tokio::test]
async fn test_download_content_handles_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/videos/video_123/content"))
        .respond_with(ResponseTemplate::new(409).set_body_string("video is not ready"))
        .mount(&mock_server)
        .await;

    let temp = tempfile::tempdir().unwrap();
    let dest = temp.path().join("video_123.mp4");

    let client = client_for(&mock_server);
    let result = client.download_content("video_123", &dest).await;

    assert!(matches!(result, Err(VideoError::ApiError(_))));
    assert!(!dest.exists());
}

#[tokio::test]
async fn test_content_downloader_names_file_after_job() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/videos/video_789/content"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp4".to_vec()))
        .mount(&mock_server)
        .await;

    let temp = tempfile::tempdir().unwrap();
    let downloader = ContentDownloader::new(client_for(&mock_server));
    let job = Job::new("video_789", Some("completed"));

    let path = downloader.download(&job, temp.path()).await.unwrap();

    assert_eq!(path, temp.path().join("video_789.mp4"));
    assert_eq!(std::fs::read(&path).unwrap(), b"mp4");
}

#[tokio::test]
async fn test_download_uses_its_own_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/videos/video_slow/content"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"mp4".to_vec())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let temp = tempfile::tempdir().unwrap();
    let dest = temp.path().join("video_slow.mp4");
    let client = client_for(&mock_server).with_download_timeout(Duration::from_millis(50));

    let result = client.download_content("video_slow", &dest).await;

    match result {
        Err(VideoError::HttpError(e)) => assert!(e.is_timeout(), "unexpected error: {e}"),
        other => panic!("Expected HttpError, got {:?}", other),
    }
    assert!(!dest.exists());
}

#[tokio::test]
async fn test_failed_download_leaves_no_partial_file() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/videos/video_123/content"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp4 bytes".to_vec()))
        .mount(&mock_server)
        .await;

    // A directory in the way makes the final rename fail after the body is written.
    let temp = tempfile::tempdir().unwrap();
    let dest = temp.path().join("video_123.mp4");
    std::fs::create_dir(&dest).unwrap();
    std::fs::write(dest.join("keep"), b"x").unwrap();

    let client = client_for(&mock_server);
    let result = client.download_content("video_123", &dest).await;

    assert!(matches!(result, Err(VideoError::IoError(_))));
    assert!(dest.is_dir());
    assert!(!temp.path().join("video_123.mp4.part").exists());
}

#[tokio::test]
async fn test_unsafe_job_id_never_reaches_server() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp4".to_vec()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let temp = tempfile::tempdir().unwrap();
    let client = client_for(&mock_server);

    let result = client.retrieve_video("../admin").await;
    assert!(matches!(result, Err(VideoError::InvalidJobId(_))));

    let downloader = ContentDownloader::new(client);
    let job = Job::new("../../escape", Some("completed"));
    let result = downloader.download(&job, temp.path()).await;
    assert!(matches!(result, Err(VideoError::InvalidJobId(_))));
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_connection_refused_is_http_error() {
    let client =
        VideoClient::with_base_url("test-key".to_string(), "http://127.0.0.1:9".to_string())
            .unwrap();

    let result = client.retrieve_video("video_123").await;
    assert!(matches!(result, Err(VideoError::HttpError(_))));
}

// === End-to-end through the pipeline ===

mod end_to_end {
    use super::*;
    use clap::Parser;
    use sora_gen::cli::Args;
    use sora_gen::config::Config;
    use sora_gen::pipeline::{self, PipelineError};
    use sora_gen::reference::ReferenceError;
    use sora_gen::settings::RunSettings;
    use sora_gen::video::PollSettings;

    fn settings(temp: &std::path::Path, extra: &[String]) -> RunSettings {
        let mut argv = vec![
            "sora-gen".to_string(),
            "waves at night".to_string(),
            "--output".to_string(),
            temp.join("out").display().to_string(),
            "--references-dir".to_string(),
            temp.join("refs").display().to_string(),
        ];
        argv.extend_from_slice(extra);
        let mut settings =
            RunSettings::resolve(&Args::parse_from(argv), &Config::default()).unwrap();
        settings.poll = PollSettings {
            interval: Duration::from_millis(5),
            max_attempts: 5,
        };
        settings
    }

    #[tokio::test]
    async fn test_full_run_downloads_video() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/videos"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": "video_e2e", "status": "queued"})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/videos/video_e2e"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": "video_e2e", "status": "completed"})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/videos/video_e2e/content"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"rendered".to_vec()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let temp = tempfile::tempdir().unwrap();
        let settings = settings(temp.path(), &[]);
        let client = client_for(&mock_server);
        let downloader = ContentDownloader::new(client.clone());

        let outcome = pipeline::run(&settings, &client, Some(&downloader as &dyn Downloader))
            .await
            .unwrap();

        let expected = temp.path().join("out").join("video_e2e.mp4");
        assert_eq!(outcome.video, Some(expected.clone()));
        assert_eq!(std::fs::read(expected).unwrap(), b"rendered");
    }

    #[tokio::test]
    async fn test_missing_reference_never_reaches_server() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/videos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "nope"})))
            .expect(0)
            .mount(&mock_server)
            .await;

        let temp = tempfile::tempdir().unwrap();
        let settings = settings(
            temp.path(),
            &["--reference".to_string(), "missing.png".to_string()],
        );
        let client = client_for(&mock_server);

        let result = pipeline::run(&settings, &client, None).await;

        assert!(matches!(
            result,
            Err(PipelineError::Reference(
                ReferenceError::MissingReferenceFile(_)
            ))
        ));
    }

    #[tokio::test]
    async fn test_api_rejection_propagates_unchanged() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/videos"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "Incorrect API key provided"}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let temp = tempfile::tempdir().unwrap();
        let settings = settings(temp.path(), &[]);
        let client = client_for(&mock_server);

        let result = pipeline::run(&settings, &client, None).await;

        match result {
            Err(PipelineError::Video(VideoError::ApiError(message))) => {
                assert!(message.contains("Incorrect API key provided"));
            }
            other => panic!("Expected ApiError, got {:?}", other),
        }
    }
}
