//! Video job records and status classification.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::VideoError;

/// Status strings that mean the video finished rendering.
pub const SUCCEEDED_STATUSES: &[&str] = &["completed", "ready", "succeeded"];

/// Status strings that mean the job ended without a video.
pub const FAILED_STATUSES: &[&str] = &["failed", "cancelled", "errored"];

/// A video job as reported by the service.
///
/// Only `id` and `status` are interpreted locally. Every other field is kept
/// in `extra` so the full record can be logged or re-serialized unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Job {
    pub fn new(id: impl Into<String>, status: Option<&str>) -> Self {
        Self {
            id: id.into(),
            status: status.map(str::to_string),
            extra: Map::new(),
        }
    }

    /// Classify the current status.
    pub fn classify(&self) -> JobStatus {
        JobStatus::classify(self.status.as_deref())
    }

    /// Status string for logging, `unknown` when the service sent none.
    pub fn status_label(&self) -> &str {
        self.status.as_deref().unwrap_or("unknown")
    }

    /// Failure reason, if the service provided one.
    ///
    /// Looks at `error.message` first, then `failure_reason`.
    pub fn failure_reason(&self) -> Option<&str> {
        self.extra
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .or_else(|| self.extra.get("failure_reason").and_then(Value::as_str))
    }
}

/// Where a job stands from the poller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// Not terminal yet. Covers queued, in-progress, unrecognized and absent statuses.
    Waiting,
    /// The video is ready.
    Succeeded,
    /// The job ended without producing a video.
    Failed,
}

impl JobStatus {
    pub fn classify(status: Option<&str>) -> Self {
        match status {
            Some(s) if SUCCEEDED_STATUSES.contains(&s) => JobStatus::Succeeded,
            Some(s) if FAILED_STATUSES.contains(&s) => JobStatus::Failed,
            _ => JobStatus::Waiting,
        }
    }

}

/// Check that a service-supplied job id is safe to use as a URL segment and a file name.
pub fn validate_job_id(id: &str) -> Result<(), VideoError> {
    if id.is_empty() || id == "." || id.contains("..") || id.contains(['/', '\\']) {
        return Err(VideoError::InvalidJobId(id.to_string()));
    }
    Ok(())
}
