//! Directory enumeration behind a trait seam.
//!
//! The walker never touches `std::fs` directly; it goes through
//! [`DirectorySource`] so tests can inject open failures, partial listings,
//! and synthetic trees of arbitrary size. [`FsSource`] is the production
//! implementation.

use std::ffi::OsString;
use std::fs;
use std::path::Path;

/// One immediate child of a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Entry name (not the full path).
    pub name: OsString,
    /// Whether the entry is a directory to recurse into. Symlinks are not
    /// followed and report as files.
    pub is_dir: bool,
    /// Byte size for files; 0 for directories.
    pub size_bytes: u64,
}

/// Result of listing one directory.
///
/// `entries` and `error` are not mutually exclusive: a partial enumeration
/// returns the entries that were read alongside the error text. Callers
/// must use whatever entries are present regardless of `error`.
#[derive(Debug, Clone, Default)]
pub struct DirListing {
    /// Successfully enumerated children, possibly a partial set.
    pub entries: Vec<EntryInfo>,
    /// Human-readable description of an open or enumeration failure.
    pub error: Option<String>,
}

impl DirListing {
    /// Listing for a directory that could not be opened at all.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Source of directory listings for the traversal engine.
pub trait DirectorySource: Send + Sync {
    /// List the immediate children of `path`. Never panics on I/O trouble;
    /// failures are folded into the returned [`DirListing`].
    fn read_dir(&self, path: &Path) -> DirListing;
}

/// Real-filesystem source backed by `std::fs::read_dir`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSource;

impl DirectorySource for FsSource {
    fn read_dir(&self, path: &Path) -> DirListing {
        let iter = match fs::read_dir(path) {
            Ok(iter) => iter,
            Err(err) => return DirListing::failed(format!("cannot open: {err}")),
        };

        let mut listing = DirListing::default();
        for entry_result in iter {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(err) => {
                    // Keep what we have; partial results are still counted.
                    listing.error = Some(format!("cannot read entry: {err}"));
                    continue;
                }
            };

            // file_type() is usually free (cached in the directory entry).
            // A symlink is neither followed nor recursed into; it counts as
            // a file of its own link size below.
            let is_dir = entry.file_type().is_ok_and(|ft| ft.is_dir());

            let size_bytes = if is_dir {
                0
            } else {
                match entry.metadata() {
                    Ok(meta) => meta.len(),
                    Err(err) => {
                        listing.error = Some(format!("cannot stat {:?}: {err}", entry.file_name()));
                        continue;
                    }
                }
            };

            listing.entries.push(EntryInfo {
                name: entry.file_name(),
                is_dir,
                size_bytes,
            });
        }
        listing
    }
}
