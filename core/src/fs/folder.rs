//! Whole-folder image enumeration, independent of channel tokens.

use std::path::Path;

use super::locator::{DirectoryLister, StdDirectoryLister};
use super::{Result, natural, util};
use crate::error::IngestError;

/// Enumerate the decodable images directly inside `root`, sorted using natural ordering.
///
/// Hidden files and files with extensions the codec does not handle are skipped.
pub fn find_images(root: &Path) -> Result<Vec<String>> {
    find_images_with(&StdDirectoryLister, root)
}

pub fn find_images_with<L: DirectoryLister>(lister: &L, root: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in lister.list(root)? {
        if !entry.is_file() {
            continue;
        }

        // Filter on the raw name first so unrelated non UTF-8 files are simply skipped.
        if util::is_hidden(&entry.name.to_string_lossy())
            || !util::is_supported_image(Path::new(&entry.name))
        {
            continue;
        }

        let name = entry.name.into_string().map_err(|raw| IngestError::InvalidInput {
            message: format!("file name {raw:?} in {} is not valid UTF-8", root.display()),
        })?;

        names.push(name);
    }

    natural::natural_sort(&mut names);
    Ok(names)
}
