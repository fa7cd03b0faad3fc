//! Resolve CLI arguments and the config file into one validated run.

use std::path::PathBuf;

use crate::cli::Args;
use crate::config::Config;
use crate::logging::LogSettings;
use crate::pipeline::PipelineError;
use crate::size::VideoSize;
use crate::video::{GenerationRequest, PollSettings, DEFAULT_MODEL};

/// Everything a run needs, after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub request: GenerationRequest,
    pub model: String,
    pub output_dir: PathBuf,
    pub references_dir: PathBuf,
    pub poll: PollSettings,
    /// False when the download step should be skipped.
    pub download: bool,
    /// Base URL from the config file. `OPENAI_BASE_URL` still wins.
    pub base_url: Option<String>,
    pub log: LogSettings,
}

impl RunSettings {
    /// Merge `args` over `config`.
    ///
    /// # Errors
    ///
    /// - `PipelineError::InvalidSize` for a malformed `--size`
    /// - `PipelineError::Video` for an empty prompt
    pub fn resolve(args: &Args, config: &Config) -> Result<Self, PipelineError> {
        let size: VideoSize = args.size.parse()?;
        let request =
            GenerationRequest::new(&args.prompt, size, args.seconds, args.reference.clone())?;

        let model = args
            .model
            .clone()
            .or_else(|| config.api.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self {
            request,
            model,
            output_dir: args.output.clone(),
            references_dir: args.references_dir.clone(),
            poll: config.poll.settings(),
            download: config.output.download && !args.no_download,
            base_url: config.api.base_url.clone(),
            log: LogSettings::resolve(args.verbose, config.log.level.as_deref()),
        })
    }
}
