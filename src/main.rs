use clap::Parser;

use sora_gen::cli::Args;
use sora_gen::config::Config;
use sora_gen::logging;
use sora_gen::pipeline::{self, PipelineError};
use sora_gen::settings::RunSettings;
use sora_gen::video::{ContentDownloader, Downloader, VideoClient};

/// Load .env file without overriding existing variables.
///
/// A missing `.env` is not an error.
fn load_env() {
    let _ = dotenv::dotenv();
}

fn run(args: Args) -> Result<(), PipelineError> {
    let config = Config::load(args.config.as_deref())?;
    let settings = RunSettings::resolve(&args, &config)?;
    logging::init(&settings.log);

    let client = VideoClient::from_env(settings.base_url.as_deref())?;
    log::debug!("Using API base URL {}", client.base_url());

    let downloader = settings
        .download
        .then(|| ContentDownloader::new(client.clone()));

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let outcome = rt.block_on(pipeline::run(
        &settings,
        &client,
        downloader.as_ref().map(|d| d as &dyn Downloader),
    ))?;

    match outcome.video {
        Some(path) => println!("{}", path.display()),
        None => println!("{}", outcome.job.id),
    }
    Ok(())
}

fn main() {
    load_env();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
