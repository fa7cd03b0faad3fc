//! Video size parsing (`WIDTHxHEIGHT`).

use std::fmt;
use std::str::FromStr;

/// Default target resolution (portrait 720p).
pub const DEFAULT_SIZE: &str = "720x1280";

/// Error returned when a size string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SizeError {
    #[error("Invalid size format '{0}'. Use e.g. 720x1280")]
    InvalidSizeFormat(String),
}

/// Target video resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoSize {
    pub width: u32,
    pub height: u32,
}

impl VideoSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl FromStr for VideoSize {
    type Err = SizeError;

    /// Parse a `WxH` string. The separator is case-insensitive and each
    /// component may be padded with whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SizeError::InvalidSizeFormat(s.to_string());

        let lower = s.to_lowercase();
        let (width_str, height_str) = lower.split_once('x').ok_or_else(invalid)?;

        // u32 parsing rejects signs and a second separator in the height part
        let width: u32 = width_str.trim().parse().map_err(|_| invalid())?;
        let height: u32 = height_str.trim().parse().map_err(|_| invalid())?;

        if width == 0 || height == 0 {
            return Err(invalid());
        }

        Ok(Self { width, height })
    }
}

impl fmt::Display for VideoSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Parse a size string into a `(width, height)` pair.
pub fn parse_size(s: &str) -> Result<(u32, u32), SizeError> {
    let size: VideoSize = s.parse()?;
    Ok((size.width, size.height))
}
