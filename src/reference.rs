//! Reference image preparation.
//!
//! The reference image conditions the first frame of the generated video, so it
//! must match the requested resolution exactly. Images are cover-fit: scaled
//! until the target box is fully covered, then center-cropped.

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{GenericImageView, ImageFormat, ImageReader};

use crate::size::VideoSize;

/// Errors that can occur while preparing a reference image.
#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    #[error("Reference image '{}' does not exist", .0.display())]
    MissingReferenceFile(PathBuf),

    #[error("Failed to process reference image: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Compute where the resized copy of `source` is written.
///
/// `{output_dir}/{stem}_{width}x{height}.png`
pub fn reference_output_path(source: &Path, size: VideoSize, output_dir: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "reference".to_string());
    output_dir.join(format!("{}_{}.png", stem, size))
}

/// Resize `source` to exactly `size` and write it as PNG into `output_dir`.
///
/// Returns the path of the written file. Re-running with the same inputs
/// overwrites the same file.
pub fn prepare_reference(
    source: &Path,
    size: VideoSize,
    output_dir: &Path,
) -> Result<PathBuf, ReferenceError> {
    if !source.exists() {
        return Err(ReferenceError::MissingReferenceFile(source.to_path_buf()));
    }

    std::fs::create_dir_all(output_dir)?;
    let output_path = reference_output_path(source, size, output_dir);

    let img = ImageReader::open(source)?.with_guessed_format()?.decode()?;
    let (orig_width, orig_height) = img.dimensions();
    log::info!(
        "Original reference image: mode={:?}, size={}x{}",
        img.color(),
        orig_width,
        orig_height
    );

    let resized = img.resize_to_fill(size.width, size.height, FilterType::Lanczos3);
    resized.save_with_format(&output_path, ImageFormat::Png)?;

    log::info!(
        "Saved resized reference to {}",
        output_path
            .canonicalize()
            .unwrap_or_else(|_| output_path.clone())
            .display()
    );

    Ok(output_path)
}
