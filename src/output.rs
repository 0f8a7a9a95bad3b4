//! Output path resolution and PNG encoding of the finished mockup.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};

use crate::error::MockupError;

/// Where the mockup is written when nothing else is configured.
pub const DEFAULT_OUTPUT: &str = "mockup_result.png";

/// Encode the canvas as an RGBA PNG in memory.
///
/// # Errors
///
/// Returns an error if the PNG encoder fails.
pub fn encode_png(canvas: &RgbaImage) -> Result<Vec<u8>, MockupError> {
    let mut buf = Cursor::new(Vec::new());
    canvas
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| MockupError::Encode(format!("Failed to encode PNG: {e}")))?;
    Ok(buf.into_inner())
}

/// Encode `canvas` and write it to `output_path`.
///
/// The bytes go to a sibling `.part` file first and are renamed into place,
/// so a failed run never leaves a truncated mockup behind.
///
/// # Errors
///
/// Returns an error if encoding or any filesystem step fails.
pub fn save_png(canvas: &RgbaImage, output_path: &Path) -> Result<(), MockupError> {
    let data = encode_png(canvas)?;
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let partial = partial_path(output_path);
    std::fs::write(&partial, &data)?;
    std::fs::rename(&partial, output_path).inspect_err(|_| {
        let _ = std::fs::remove_file(&partial);
    })?;
    Ok(())
}

fn partial_path(output_path: &Path) -> PathBuf {
    let mut name = output_path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    output_path.with_file_name(name)
}

/// Resolve the output path: explicit flag, then config, then the default.
#[must_use]
pub fn resolve_output_path(explicit: Option<&str>, configured: Option<&str>) -> PathBuf {
    PathBuf::from(explicit.or(configured).unwrap_or(DEFAULT_OUTPUT))
}
