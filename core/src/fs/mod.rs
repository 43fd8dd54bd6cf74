//! File system access layer: natural ordering and channel file discovery.

pub mod folder;
pub mod locator;
pub mod natural;
mod util;

pub use folder::{find_images, find_images_with};
pub use locator::{
    ChannelFileLocator, DirEntryInfo, DirectoryLister, EntryKind, LocatorOptions,
    StdDirectoryLister, find_channel_files,
};
pub use natural::{
    Run, SortKey, natural_cmp, natural_sort, sort_os_names, sorted_naturally, tokenize,
};
pub use util::{IMAGE_EXTENSIONS, is_supported_image};

/// Shared result type for fs operations.
pub type Result<T> = crate::Result<T>;
