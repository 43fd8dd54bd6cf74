//! Channel file discovery: list one directory, keep names containing a channel token, and
//! return them in natural order.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, trace};

use crate::error::IngestError;

use super::{Result, natural, util};

/// Kind of a directory entry as reported by a [`DirectoryLister`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Sockets, devices, dangling links and anything else that is neither.
    Other,
}

/// One entry directly inside a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: OsString,
    pub kind: EntryKind,
}

impl DirEntryInfo {
    pub fn new(name: impl Into<OsString>, kind: EntryKind) -> Self {
        Self { name: name.into(), kind }
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Flat, non-recursive directory listing.
pub trait DirectoryLister {
    /// List the entries directly inside `dir`.
    ///
    /// Must fail with [`IngestError::DirectoryNotFound`] when `dir` is missing or not a
    /// directory and with [`IngestError::AccessDenied`] when listing is refused.
    fn list(&self, dir: &Path) -> Result<Vec<DirEntryInfo>>;
}

impl<F> DirectoryLister for F
where
    F: Fn(&Path) -> Result<Vec<DirEntryInfo>>,
{
    fn list(&self, dir: &Path) -> Result<Vec<DirEntryInfo>> {
        self(dir)
    }
}

/// [`DirectoryLister`] backed by `std::fs::read_dir`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDirectoryLister;

impl DirectoryLister for StdDirectoryLister {
    fn list(&self, dir: &Path) -> Result<Vec<DirEntryInfo>> {
        let metadata = fs::metadata(dir).map_err(|err| IngestError::from_io(dir, err))?;
        if !metadata.is_dir() {
            return Err(IngestError::DirectoryNotFound { path: dir.to_path_buf() });
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(dir).map_err(|err| IngestError::from_io(dir, err))? {
            let entry = entry.map_err(|err| IngestError::from_io(dir, err))?;
            let path = entry.path();

            let Some(kind) = classify_entry(dir, &path, entry.file_type())? else {
                trace!(target: "fs::locator", path = %path.display(), "entry vanished mid-scan");
                continue;
            };

            entries.push(DirEntryInfo { name: entry.file_name(), kind });
        }

        Ok(entries)
    }
}

/// Resolve the kind of one listed entry. `Ok(None)` means it was removed mid-scan.
fn classify_entry(
    dir: &Path,
    path: &Path,
    file_type: io::Result<fs::FileType>,
) -> Result<Option<EntryKind>> {
    let file_type = match file_type {
        Ok(file_type) => file_type,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(IngestError::from_io(dir, err)),
    };

    let kind = if file_type.is_symlink() {
        // Follow links; a dangling link is reported as `Other`.
        match fs::metadata(path) {
            Ok(target) if target.is_file() => EntryKind::File,
            Ok(target) if target.is_dir() => EntryKind::Directory,
            _ => EntryKind::Other,
        }
    } else if file_type.is_file() {
        EntryKind::File
    } else if file_type.is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::Other
    };

    Ok(Some(kind))
}

/// Extra filtering applied after the token match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocatorOptions {
    /// Drop names starting with `.`.
    pub skip_hidden: bool,
    /// Keep only these extensions (case-insensitive, without the dot).
    pub extensions: Option<Vec<String>>,
}

impl LocatorOptions {
    pub fn skip_hidden(mut self, skip: bool) -> Self {
        self.skip_hidden = skip;
        self
    }

    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = Some(extensions.into_iter().map(Into::into).collect());
        self
    }

    fn accepts(&self, name: &str) -> bool {
        if self.skip_hidden && util::is_hidden(name) {
            return false;
        }
        match &self.extensions {
            Some(allowed) => util::has_extension(name, allowed),
            None => true,
        }
    }
}

/// Finds the files of one acquisition channel inside a directory.
#[derive(Debug, Clone, Default)]
pub struct ChannelFileLocator<L = StdDirectoryLister> {
    lister: L,
    options: LocatorOptions,
}

impl ChannelFileLocator<StdDirectoryLister> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L: DirectoryLister> ChannelFileLocator<L> {
    /// Use a custom filesystem collaborator.
    pub fn with_lister(lister: L) -> Self {
        Self { lister, options: LocatorOptions::default() }
    }

    pub fn with_options(mut self, options: LocatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &LocatorOptions {
        &self.options
    }

    /// Return the regular files in `dir` whose name contains `token`, in natural order.
    ///
    /// Matching is case-sensitive substring containment. An empty result means the listing
    /// succeeded and nothing matched; listing failures are returned as errors.
    pub fn find(&self, dir: &Path, token: &str) -> Result<Vec<String>> {
        let entries = self.lister.list(dir)?;
        let scanned = entries.len();

        let mut names = Vec::new();
        for entry in entries {
            if !entry.is_file() {
                trace!(target: "fs::locator", name = ?entry.name, "skipping non-file entry");
                continue;
            }

            let name = match entry.name.into_string() {
                Ok(name) => name,
                Err(raw) => {
                    // Only a name that would be kept is worth failing the lookup over.
                    let lossy = raw.to_string_lossy();
                    if lossy.contains(token) && self.options.accepts(&lossy) {
                        return Err(IngestError::InvalidInput {
                            message: format!(
                                "file name {raw:?} in {} is not valid UTF-8",
                                dir.display()
                            ),
                        });
                    }
                    trace!(target: "fs::locator", name = ?raw, "skipping non UTF-8 name");
                    continue;
                }
            };

            if name.contains(token) && self.options.accepts(&name) {
                names.push(name);
            }
        }

        natural::natural_sort(&mut names);

        debug!(
            target: "fs::locator",
            dir = %dir.display(),
            token,
            scanned,
            matched = names.len(),
            "located channel files"
        );

        Ok(names)
    }
}

/// Shorthand for [`ChannelFileLocator::find`] over the real filesystem.
pub fn find_channel_files(dir: &Path, token: &str) -> Result<Vec<String>> {
    ChannelFileLocator::new().find(dir, token)
}
