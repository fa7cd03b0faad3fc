//! CLI argument parsing with clap.

use clap::Parser;
use std::path::PathBuf;

use crate::size::DEFAULT_SIZE;
use crate::video::DEFAULT_SECONDS;

/// Submit a text-to-video request, wait for it to render, and download the result
#[derive(Parser, Debug)]
#[command(name = "sora-gen")]
#[command(version, about = "Generate a video from a text prompt", long_about = None)]
#[command(after_help = "EXAMPLES:
    sora-gen \"a paper boat drifting down a rainy street\"
    sora-gen \"slow pan across the product\" --reference shot.jpg --size 1280x720
    sora-gen \"city at dusk\" --seconds 8 --output ./clips

ENVIRONMENT:
    OPENAI_API_KEY     Required. API key for the videos endpoint.
    OPENAI_BASE_URL    Optional. Override the API base URL.
    RUST_LOG           Optional. Fine-grained log filter.")]
pub struct Args {
    /// Text prompt to animate
    pub prompt: String,

    /// Path to the reference image (optional)
    #[arg(long)]
    pub reference: Option<PathBuf>,

    /// Target video size, e.g. 720x1280
    #[arg(long, default_value = DEFAULT_SIZE)]
    pub size: String,

    /// Requested video length in seconds
    #[arg(long, default_value_t = DEFAULT_SECONDS, value_parser = clap::value_parser!(u32).range(1..))]
    pub seconds: u32,

    /// Folder where the downloaded video will be stored
    #[arg(long, default_value = "./output")]
    pub output: PathBuf,

    /// Directory for resized references
    #[arg(long, default_value = "./references")]
    pub references_dir: PathBuf,

    /// Model identifier (default: config file, then sora-2)
    #[arg(long)]
    pub model: Option<String>,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Skip the download step and log the final job record instead
    #[arg(long)]
    pub no_download: bool,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
}
