//! Logger setup.
//!
//! Library code only talks to the `log` facade. The binary resolves a
//! [`LogSettings`] at startup and hands it to [`init`]; tests never call it,
//! so their output stays quiet.

use std::io::Write;

use log::LevelFilter;

/// Resolved logging configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LevelFilter,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
        }
    }
}

impl LogSettings {
    /// `--verbose` wins, then the config file level, then `info`.
    ///
    /// Unparseable configured levels fall back to the default.
    pub fn resolve(verbose: bool, configured: Option<&str>) -> Self {
        if verbose {
            return Self {
                level: LevelFilter::Debug,
            };
        }
        configured
            .and_then(|level| level.parse().ok())
            .map(|level| Self { level })
            .unwrap_or_default()
    }
}

/// Install the stderr logger. `RUST_LOG` refines the configured level.
///
/// Calling this twice is harmless; the second call is ignored.
pub fn init(settings: &LogSettings) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(settings.level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                buf.timestamp_seconds(),
                record.level(),
                record.args()
            )
        })
        .parse_default_env();

    if builder.try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}
