//! Video generation service integration.
//!
//! Jobs are created through the OpenAI videos API, polled until they reach a
//! terminal status, and the rendered MP4 is fetched from the content endpoint.

mod client;
mod download;
mod error;
mod job;
mod poll;
mod request;

pub use client::{
    VideoClient, VideoService, DEFAULT_BASE_URL, DEFAULT_DOWNLOAD_TIMEOUT, OPENAI_API_KEY_ENV,
    OPENAI_BASE_URL_ENV,
};
pub use download::{video_file_path, ContentDownloader, Downloader};
pub use error::VideoError;
pub use job::{validate_job_id, Job, JobStatus, FAILED_STATUSES, SUCCEEDED_STATUSES};
pub use poll::{poll_until_ready, PollSettings, DEFAULT_MAX_POLLS, DEFAULT_POLL_INTERVAL};
pub use request::{
    validate_prompt, CreateVideo, GenerationRequest, DEFAULT_MODEL, DEFAULT_SECONDS,
};
