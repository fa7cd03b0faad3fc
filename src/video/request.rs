//! Generation request built from the resolved settings.

use std::path::PathBuf;

use super::error::VideoError;
use crate::size::VideoSize;

/// Model used when neither the CLI nor the config file names one.
pub const DEFAULT_MODEL: &str = "sora-2";

/// Default clip length in seconds.
pub const DEFAULT_SECONDS: u32 = 4;

/// Validate a prompt before sending it to the API.
///
/// Rejects empty or whitespace-only prompts.
pub fn validate_prompt(prompt: &str) -> Result<(), VideoError> {
    if prompt.trim().is_empty() {
        return Err(VideoError::EmptyPrompt);
    }
    Ok(())
}

/// A validated text-to-video request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    prompt: String,
    size: VideoSize,
    seconds: u32,
    reference: Option<PathBuf>,
}

impl GenerationRequest {
    pub fn new(
        prompt: &str,
        size: VideoSize,
        seconds: u32,
        reference: Option<PathBuf>,
    ) -> Result<Self, VideoError> {
        validate_prompt(prompt)?;
        if seconds == 0 {
            return Err(VideoError::InvalidDuration);
        }
        Ok(Self {
            prompt: prompt.trim().to_string(),
            size,
            seconds,
            reference,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn size(&self) -> VideoSize {
        self.size
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    /// Source image supplied by the user, before resizing.
    pub fn reference(&self) -> Option<&PathBuf> {
        self.reference.as_ref()
    }
}

/// Payload for the job creation call.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateVideo<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub size: VideoSize,
    pub seconds: u32,
    /// Prepared (resized) reference image.
    pub input_reference: Option<PathBuf>,
}
