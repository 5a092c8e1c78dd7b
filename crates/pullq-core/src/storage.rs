//! Access to local storage.
//!
//! The queue builder only reads local state: sibling directories for the
//! duplicate merger and destination occupancy for the existing-destination
//! check. [`LocalStorage`] is the seam tests replace.

use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use walkdir::WalkDir;

use crate::entry::{DirectoryEntry, EntryKind};

/// Read-only view of local storage.
pub trait LocalStorage: Send + Sync {
    /// Direct children of `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` cannot be read.
    fn list_entries(&self, dir: &Path) -> io::Result<Vec<DirectoryEntry>>;

    /// Whether `dir` is missing, unreadable, or has no children.
    fn is_empty_dir(&self, dir: &Path) -> bool;
}

/// [`LocalStorage`] backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl LocalStorage for FsStorage {
    fn list_entries(&self, dir: &Path) -> io::Result<Vec<DirectoryEntry>> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry?;
            let file_type = entry.file_type();
            let kind = if file_type.is_symlink() {
                EntryKind::Symlink
            } else if file_type.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            let modified = entry
                .metadata()?
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_default();
            entries.push(DirectoryEntry::new(
                entry.path().to_string_lossy(),
                modified,
                kind,
            ));
        }
        Ok(entries)
    }

    fn is_empty_dir(&self, dir: &Path) -> bool {
        fs::read_dir(dir).map_or(true, |mut children| children.next().is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lists_direct_children_only() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        fs::create_dir_all(temp.path().join("Show.S01E01.1080p/nested"))?;
        fs::write(temp.path().join("notes.txt"), "x")?;

        let entries = FsStorage.list_entries(temp.path())?;
        let names: Vec<&str> = entries.iter().map(DirectoryEntry::base).collect();
        assert_eq!(names, vec!["Show.S01E01.1080p", "notes.txt"]);
        assert_eq!(entries[0].kind(), EntryKind::Directory);
        assert_eq!(entries[1].kind(), EntryKind::File);
        Ok(())
    }

    #[test]
    fn missing_directories_count_as_empty() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        assert!(FsStorage.is_empty_dir(&temp.path().join("absent")));
        assert!(FsStorage.is_empty_dir(temp.path()));
        fs::write(temp.path().join("file"), "x")?;
        assert!(!FsStorage.is_empty_dir(temp.path()));
        assert!(FsStorage.list_entries(&temp.path().join("absent")).is_err());
        Ok(())
    }
}
