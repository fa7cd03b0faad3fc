//! Downloading finished videos.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::client::VideoClient;
use super::error::VideoError;
use super::job::{validate_job_id, Job};

/// Persists a finished video somewhere under an output directory.
///
/// The pipeline takes this as an optional collaborator. Without one it logs the
/// raw job record instead of writing a file.
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download(&self, job: &Job, output_dir: &Path) -> Result<PathBuf, VideoError>;
}

/// File name used for a downloaded video: `{id}.mp4`.
///
/// Ids that could escape `output_dir` are rejected.
pub fn video_file_path(output_dir: &Path, id: &str) -> Result<PathBuf, VideoError> {
    validate_job_id(id)?;
    Ok(output_dir.join(format!("{}.mp4", id)))
}

/// Downloads the rendered MP4 through the videos API content endpoint.
#[derive(Clone)]
pub struct ContentDownloader {
    client: VideoClient,
}

impl ContentDownloader {
    pub fn new(client: VideoClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Downloader for ContentDownloader {
    async fn download(&self, job: &Job, output_dir: &Path) -> Result<PathBuf, VideoError> {
        let dest = video_file_path(output_dir, &job.id)?;
        log::info!("Downloading finished video to {}", dest.display());
        self.client.download_content(&job.id, &dest).await
    }
}
