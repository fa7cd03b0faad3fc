//! The generate pipeline: reference → submit → poll → download.
//!
//! Every stage runs in order on the caller's task. The service and the
//! downloader are passed in so tests can script them.

use std::path::{Path, PathBuf};

use crate::config::ConfigError;
use crate::reference::{prepare_reference, ReferenceError};
use crate::settings::RunSettings;
use crate::size::SizeError;
use crate::video::{poll_until_ready, CreateVideo, Downloader, Job, VideoError, VideoService};

/// Errors that can end a run.
#[derive(Debug)]
pub enum PipelineError {
    /// Config file missing, unreadable or invalid
    Config(ConfigError),
    /// `--size` is not a valid `WxH` string
    InvalidSize(SizeError),
    /// Reference image missing or unprocessable
    Reference(ReferenceError),
    /// Service, job failure or poll timeout
    Video(VideoError),
    /// Filesystem error outside the stages above
    Io(std::io::Error),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Config(e) => write!(f, "{}", e),
            PipelineError::InvalidSize(e) => write!(f, "{}", e),
            PipelineError::Reference(e) => write!(f, "{}", e),
            PipelineError::Video(e) => write!(f, "{}", e),
            PipelineError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Config(e) => Some(e),
            PipelineError::InvalidSize(e) => Some(e),
            PipelineError::Reference(e) => Some(e),
            PipelineError::Video(e) => Some(e),
            PipelineError::Io(e) => Some(e),
        }
    }
}

impl From<ConfigError> for PipelineError {
    fn from(e: ConfigError) -> Self {
        PipelineError::Config(e)
    }
}

impl From<SizeError> for PipelineError {
    fn from(e: SizeError) -> Self {
        PipelineError::InvalidSize(e)
    }
}

impl From<ReferenceError> for PipelineError {
    fn from(e: ReferenceError) -> Self {
        PipelineError::Reference(e)
    }
}

impl From<VideoError> for PipelineError {
    fn from(e: VideoError) -> Self {
        PipelineError::Video(e)
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(e: std::io::Error) -> Self {
        PipelineError::Io(e)
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// Final job record as returned by the last status query.
    pub job: Job,
    /// Resized reference that was uploaded, if any.
    pub reference: Option<PathBuf>,
    /// Downloaded video, or `None` when no downloader was supplied.
    pub video: Option<PathBuf>,
}

/// Run the whole pipeline once.
///
/// A missing reference image is reported before anything is sent to the
/// service. Without a `downloader` the run still succeeds: the final job
/// record is logged and `RunOutcome::video` is `None`.
pub async fn run<S>(
    settings: &RunSettings,
    service: &S,
    downloader: Option<&dyn Downloader>,
) -> Result<RunOutcome, PipelineError>
where
    S: VideoService + ?Sized,
{
    let request = &settings.request;

    let reference = match request.reference() {
        Some(source) => Some(prepare_reference(
            source,
            request.size(),
            &settings.references_dir,
        )?),
        None => None,
    };

    log::info!(
        "Submitting video request with model={} size={} seconds={}",
        settings.model,
        request.size(),
        request.seconds()
    );
    let create = CreateVideo {
        model: &settings.model,
        prompt: request.prompt(),
        size: request.size(),
        seconds: request.seconds(),
        input_reference: reference.clone(),
    };
    let job = service.create(&create).await?;
    log::info!(
        "Video request accepted: id={} status={}",
        job.id,
        job.status_label()
    );

    let final_job = poll_until_ready(service, &job.id, &settings.poll).await?;

    std::fs::create_dir_all(&settings.output_dir)?;
    let video = match downloader {
        Some(downloader) => {
            let path = downloader.download(&final_job, &settings.output_dir).await?;
            log::info!("Video saved to {}", display_path(&path).display());
            Some(path)
        }
        None => {
            log::warn!("No downloader configured; skipping download step");
            log::info!("Final video payload: {}", render_job(&final_job));
            None
        }
    };

    Ok(RunOutcome {
        job: final_job,
        reference,
        video,
    })
}

fn render_job(job: &Job) -> String {
    serde_json::to_string_pretty(job).unwrap_or_else(|_| format!("{:?}", job))
}

fn display_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
