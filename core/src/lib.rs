//! Frame discovery and loading for microscopy acquisitions.
//!
//! [`fs::ChannelFileLocator`] lists the files of one channel in natural order (`multi2.tif`
//! before `multi10.tif`), and [`codec::decode_image`] turns each file into a normalized
//! `(height, width)` array.

#![deny(missing_debug_implementations)]

pub mod codec;
pub mod error;
pub mod fs;
pub mod ingest;
pub mod log;

pub use error::IngestError;

pub type Result<T> = std::result::Result<T, IngestError>;

pub use codec::decode_image;
pub use fs::{ChannelFileLocator, find_channel_files, natural_cmp, sorted_naturally};
pub use ingest::{Frame, load_channel};

/// Returns the version of the core crate for telemetry and debugging.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
