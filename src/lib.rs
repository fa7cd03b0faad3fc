//! sora-gen library crate.
//!
//! Text-to-video generation against the OpenAI videos API: size parsing,
//! reference image preparation, job submission, bounded polling and download.

pub mod cli;
pub mod config;
pub mod logging;
pub mod pipeline;
pub mod reference;
pub mod settings;
pub mod size;
pub mod video;
