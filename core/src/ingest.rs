//! Loading every frame of one channel in acquisition order.

use std::path::Path;

use ndarray::Array2;
use tracing::{debug, warn};

use crate::Result;
use crate::codec::decode_image;
use crate::fs::{ChannelFileLocator, DirectoryLister};

/// A decoded frame together with the file name it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub name: String,
    pub data: Array2<f32>,
}

impl Frame {
    /// `(height, width)` of the frame.
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }
}

/// Locate the files of `token` inside `dir` and decode them in natural order.
pub fn load_channel(dir: &Path, token: &str) -> Result<Vec<Frame>> {
    load_channel_with(&ChannelFileLocator::new(), dir, token)
}

/// Same as [`load_channel`] with a caller-supplied locator. The first decode failure aborts.
pub fn load_channel_with<L: DirectoryLister>(
    locator: &ChannelFileLocator<L>,
    dir: &Path,
    token: &str,
) -> Result<Vec<Frame>> {
    let names = locator.find(dir, token)?;
    let mut frames = Vec::with_capacity(names.len());

    for name in names {
        let data = decode_image(&dir.join(&name)).inspect_err(|err| {
            warn!(target: "ingest", %name, "failed to decode frame: {err}");
        })?;
        frames.push(Frame { name, data });
    }

    debug!(target: "ingest", dir = %dir.display(), token, frames = frames.len(), "loaded channel");
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngestError;
    use image::{GrayImage, ImageBuffer, Luma};
    use tempfile::tempdir;

    fn write_frame(dir: &Path, name: &str, value: u8) {
        let image: GrayImage = ImageBuffer::from_pixel(4, 3, Luma([value]));
        image.save(dir.join(name)).unwrap();
    }

    #[test]
    fn loads_frames_in_natural_order() {
        let dir = tempdir().unwrap();
        write_frame(dir.path(), "multi10.tif", 10);
        write_frame(dir.path(), "multi2.tif", 2);
        write_frame(dir.path(), "multi1.png", 1);
        write_frame(dir.path(), "channel.tif", 99);

        let frames = load_channel(dir.path(), "multi").expect("load");
        let names: Vec<&str> = frames.iter().map(|frame| frame.name.as_str()).collect();
        assert_eq!(names, vec!["multi1.png", "multi2.tif", "multi10.tif"]);
        assert!(frames.iter().all(|frame| frame.shape() == (3, 4)));
        assert!((frames[2].data[[0, 0]] - 10.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn undecodable_member_fails_the_load() {
        let dir = tempdir().unwrap();
        write_frame(dir.path(), "multi1.tif", 1);
        std::fs::write(dir.path().join("multi2.txt"), b"log").unwrap();

        let err = load_channel(dir.path(), "multi").unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
    }

    #[test]
    fn no_matches_yields_no_frames() {
        let dir = tempdir().unwrap();
        write_frame(dir.path(), "channel.tif", 1);

        let frames = load_channel(dir.path(), "bad_channel_name").expect("load");
        assert!(frames.is_empty());
    }
}
