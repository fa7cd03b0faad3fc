//! VideoClient - handles communication with the OpenAI videos API.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;

use super::error::VideoError;
use super::job::{validate_job_id, Job};
use super::request::CreateVideo;

/// The environment variable name for the API key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Optional environment override for the API base URL.
pub const OPENAI_BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Default base URL for the videos API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default timeout for API requests, including reference uploads.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Default timeout for streaming a finished video to disk.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(600);

/// Default connection timeout (10 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// The two calls the pipeline needs from the video service.
///
/// Implemented by [`VideoClient`]; tests substitute scripted fakes.
#[async_trait]
pub trait VideoService: Send + Sync {
    /// Create a generation job.
    async fn create(&self, request: &CreateVideo<'_>) -> Result<Job, VideoError>;

    /// Fetch the current state of a job.
    async fn retrieve(&self, id: &str) -> Result<Job, VideoError>;
}

/// Error envelope returned by the API on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for the videos API.
#[derive(Clone)]
pub struct VideoClient {
    api_key: String,
    base_url: String,
    download_timeout: Duration,
    http_client: reqwest::Client,
}

impl VideoClient {
    /// Create a client from `OPENAI_API_KEY`.
    ///
    /// The base URL comes from `OPENAI_BASE_URL` when set, then `fallback_base_url`
    /// (usually the config file), then [`DEFAULT_BASE_URL`].
    ///
    /// # Errors
    ///
    /// Returns `VideoError::MissingApiKey` if the key is not set.
    pub fn from_env(fallback_base_url: Option<&str>) -> Result<Self, VideoError> {
        let api_key = std::env::var(OPENAI_API_KEY_ENV).map_err(|_| VideoError::MissingApiKey)?;
        let base_url = std::env::var(OPENAI_BASE_URL_ENV)
            .ok()
            .or_else(|| fallback_base_url.map(str::to_string))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(api_key, base_url)
    }

    /// Create a client with an explicit API key and the default base URL.
    pub fn with_api_key(api_key: String) -> Result<Self, VideoError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Create a client with a custom base URL.
    ///
    /// Useful for proxies and for testing against a mock server.
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, VideoError> {
        if api_key.is_empty() {
            return Err(VideoError::MissingApiKey);
        }

        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            download_timeout: DEFAULT_DOWNLOAD_TIMEOUT,
            http_client,
        })
    }

    /// Override the timeout for [`VideoClient::download_content`].
    ///
    /// Replaces the shorter API timeout for the whole content transfer.
    pub fn with_download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = timeout;
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn videos_url(&self) -> String {
        format!("{}/videos", self.base_url)
    }

    fn video_url(&self, id: &str) -> Result<String, VideoError> {
        validate_job_id(id)?;
        Ok(format!("{}/videos/{}", self.base_url, id))
    }

    fn authorization(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    /// Submit a generation job.
    ///
    /// Sends a multipart POST with `model`, `prompt`, `size`, `seconds` and,
    /// when present, the prepared reference image as `input_reference`.
    ///
    /// # Errors
    ///
    /// Returns `VideoError::ApiError` if the API rejects the request,
    /// `VideoError::IoError` if the reference image cannot be read,
    /// or `VideoError::HttpError` if the request fails.
    pub async fn create_video(&self, request: &CreateVideo<'_>) -> Result<Job, VideoError> {
        let mut form = Form::new()
            .text("model", request.model.to_string())
            .text("prompt", request.prompt.to_string())
            .text("size", request.size.to_string())
            .text("seconds", request.seconds.to_string());

        if let Some(reference) = &request.input_reference {
            let bytes = tokio::fs::read(reference).await?;
            let file_name = reference
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "reference.png".to_string());
            log::debug!(
                "Attaching reference {} ({} bytes)",
                file_name,
                bytes.len()
            );
            let part = Part::bytes(bytes)
                .file_name(file_name)
                .mime_str("image/png")?;
            form = form.part("input_reference", part);
        }

        let response = self
            .http_client
            .post(self.videos_url())
            .header("Authorization", self.authorization())
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error("Video request", response).await);
        }

        let job: Job = response.json().await?;
        Ok(job)
    }

    /// Fetch the current job record.
    ///
    /// # Errors
    ///
    /// Returns `VideoError::ApiError` for non-2xx responses or
    /// `VideoError::HttpError` if the request fails.
    pub async fn retrieve_video(&self, id: &str) -> Result<Job, VideoError> {
        let response = self
            .http_client
            .get(self.video_url(id)?)
            .header("Authorization", self.authorization())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error("Status check", response).await);
        }

        let job: Job = response.json().await?;
        Ok(job)
    }

    /// Stream the rendered video for `id` to `dest`.
    ///
    /// Chunks go to `{dest}.part`, which is renamed to `dest` once the body is
    /// complete and removed if anything fails. Parent directories are created
    /// if missing.
    pub async fn download_content(&self, id: &str, dest: &Path) -> Result<PathBuf, VideoError> {
        let url = format!("{}/content", self.video_url(id)?);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let response = self
            .http_client
            .get(url)
            .header("Authorization", self.authorization())
            .timeout(self.download_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error("Video download", response).await);
        }

        let partial = partial_path(dest);
        let result = async {
            let written = write_body(response, &partial).await?;
            tokio::fs::rename(&partial, dest).await?;
            Ok::<_, VideoError>(written)
        }
        .await;

        match result {
            Ok(written) => {
                log::debug!("Wrote {} bytes to {}", written, dest.display());
                Ok(dest.to_path_buf())
            }
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
                    log::debug!("Could not remove {}: {}", partial.display(), cleanup);
                }
                Err(e)
            }
        }
    }
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

async fn write_body(response: reqwest::Response, path: &Path) -> Result<usize, VideoError> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut stream = response.bytes_stream();
    let mut written = 0usize;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result?;
        written += chunk.len();
        file.write_all(&chunk).await?;
    }

    file.flush().await?;
    Ok(written)
}

#[async_trait]
impl VideoService for VideoClient {
    async fn create(&self, request: &CreateVideo<'_>) -> Result<Job, VideoError> {
        self.create_video(request).await
    }

    async fn retrieve(&self, id: &str) -> Result<Job, VideoError> {
        self.retrieve_video(id).await
    }
}

/// Turn a non-2xx response into `VideoError::ApiError`.
///
/// Prefers the API's `error.message`, falling back to the raw body.
async fn api_error(context: &str, response: reqwest::Response) -> VideoError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    log::debug!("{} failed with status {}: {}", context, status, message);
    VideoError::ApiError(format!(
        "{} failed with status {}: {}",
        context, status, message
    ))
}
