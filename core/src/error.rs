//! Error type shared by the locator, comparator, and codec layers.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by frame discovery and decoding.
#[derive(Debug, Error)]
pub enum IngestError {
    /// An input could not be interpreted as a string (e.g. a non UTF-8 file name).
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// The directory is missing or names something other than a directory.
    #[error("directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    /// Listing or reading was refused by the operating system.
    #[error("access denied: {}", path.display())]
    AccessDenied { path: PathBuf },

    /// The file extension is not a recognised image format.
    #[error("unsupported image format {extension:?} for {}", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// The payload was recognised but could not be decoded.
    #[error("failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    /// Any other I/O failure.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl IngestError {
    /// Classify an I/O error raised while accessing `path`.
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => {
                Self::DirectoryNotFound { path }
            }
            io::ErrorKind::PermissionDenied => Self::AccessDenied { path },
            _ => Self::Io { path, source },
        }
    }

    /// Returns `true` for [`IngestError::DirectoryNotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DirectoryNotFound { .. })
    }
}
