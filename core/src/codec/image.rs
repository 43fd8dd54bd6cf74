//! Single-channel image decoding into normalized 2-D arrays.

use std::fs;
use std::io::{self, Cursor};
use std::path::Path;

use image::{DynamicImage, ImageError, ImageFormat, ImageReader};
use ndarray::Array2;
use tracing::debug;

use crate::error::IngestError;
use crate::fs::IMAGE_EXTENSIONS;

use super::Result;

/// Decode the image at `path` into an `(height, width)` array of samples in `[0.0, 1.0]`.
///
/// The format is chosen from the file extension (TIFF, PNG, JPEG, GIF, WebP). 8-bit samples
/// are divided by 255 and 16-bit samples by 65535; float samples pass through. Colour input
/// is reduced to luminance, so the result never carries a channel axis.
pub fn decode_image(path: &Path) -> Result<Array2<f32>> {
    let format = format_for(path)?;
    let data = fs::read(path).map_err(|err| match err.kind() {
        io::ErrorKind::PermissionDenied => IngestError::AccessDenied { path: path.to_path_buf() },
        _ => IngestError::Io { path: path.to_path_buf(), source: err },
    })?;
    decode_with_format(path, &data, format)
}

/// Decode an in-memory payload, using `path` only to pick the format and label errors.
pub fn decode_bytes(path: &Path, data: &[u8]) -> Result<Array2<f32>> {
    let format = format_for(path)?;
    decode_with_format(path, data, format)
}

fn decode_with_format(path: &Path, data: &[u8], format: ImageFormat) -> Result<Array2<f32>> {
    if data.is_empty() {
        return Err(IngestError::Decode {
            path: path.to_path_buf(),
            message: "empty image data".to_string(),
        });
    }

    let image = ImageReader::with_format(Cursor::new(data), format)
        .decode()
        .map_err(|err| classify(path, err))?;

    let array = to_array(path, image)?;
    debug!(
        target: "codec::image",
        path = %path.display(),
        height = array.nrows(),
        width = array.ncols(),
        "decoded frame"
    );
    Ok(array)
}

fn format_for(path: &Path) -> Result<ImageFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    IMAGE_EXTENSIONS
        .contains(&extension.as_str())
        .then(|| ImageFormat::from_extension(&extension))
        .flatten()
        .ok_or_else(|| IngestError::UnsupportedFormat { path: path.to_path_buf(), extension })
}

fn classify(path: &Path, err: ImageError) -> IngestError {
    match err {
        ImageError::Unsupported(_) => IngestError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: path
                .extension()
                .map(|ext| ext.to_string_lossy().into_owned())
                .unwrap_or_default(),
        },
        ImageError::IoError(source) => IngestError::Io { path: path.to_path_buf(), source },
        other => IngestError::Decode { path: path.to_path_buf(), message: other.to_string() },
    }
}

fn to_array(path: &Path, image: DynamicImage) -> Result<Array2<f32>> {
    let luma = image.to_luma32f();
    let (width, height) = luma.dimensions();

    Array2::from_shape_vec((height as usize, width as usize), luma.into_raw()).map_err(|err| {
        IngestError::Decode { path: path.to_path_buf(), message: err.to_string() }
    })
}
