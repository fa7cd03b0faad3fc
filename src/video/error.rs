//! Error types for the video generation service.

use std::time::Duration;

/// Errors that can occur while talking to the video generation service.
#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    #[error("API key not configured (set OPENAI_API_KEY)")]
    MissingApiKey,

    #[error("Empty prompt")]
    EmptyPrompt,

    #[error("Requested duration must be at least one second")]
    InvalidDuration,

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Video request failed with status '{status}' (id={id})")]
    JobFailed { id: String, status: String },

    #[error("Unsafe video id '{0}' returned by the service")]
    InvalidJobId(String),

    #[error("Video id {id} did not finish within {}s", .budget.as_secs())]
    PollTimeout { id: String, budget: Duration },
}
