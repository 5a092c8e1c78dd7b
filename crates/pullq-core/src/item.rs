//! Per-entry queue records.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::entry::DirectoryEntry;
use crate::filter::Decision;
use crate::media::MediaDescriptor;

/// Reason recorded on local copies merged into deduplication.
pub const LOCAL_REASON: &str = "Local=true";

/// One candidate in a queue.
///
/// `transfer` only starts out `true` when the rules accepted the entry. Every
/// later step can only reject, so a rejected item stays rejected.
#[derive(Debug, Clone, Serialize)]
pub struct Item {
    #[serde(flatten)]
    pub(crate) entry: DirectoryEntry,
    pub(crate) local_dir: Option<String>,
    pub(crate) transfer: bool,
    pub(crate) reason: String,
    pub(crate) duplicate: bool,
    pub(crate) merged: bool,
    pub(crate) weight: usize,
    pub(crate) media: MediaDescriptor,
}

impl Item {
    /// Create an item from a rule decision.
    #[must_use]
    pub fn new(entry: DirectoryEntry, decision: Decision, weight: usize) -> Self {
        let transfer = decision.is_accept();
        let reason = match decision {
            Decision::Accept(reason) | Decision::Reject(reason) => reason,
        };
        Self {
            entry,
            local_dir: None,
            transfer,
            reason,
            duplicate: false,
            merged: false,
            weight,
            media: MediaDescriptor::None,
        }
    }

    /// Create a non-transferable item for a copy already present locally.
    #[must_use]
    pub fn local(entry: DirectoryEntry, media: MediaDescriptor, weight: usize) -> Self {
        Self {
            local_dir: Some(entry.path().to_string()),
            entry,
            transfer: false,
            reason: LOCAL_REASON.to_string(),
            duplicate: false,
            merged: true,
            weight,
            media,
        }
    }

    /// Reject the item, recording why.
    pub fn reject(&mut self, reason: impl Into<String>) {
        self.transfer = false;
        self.reason = reason.into();
    }

    /// Reject the item as a duplicate of `winner`.
    pub(crate) fn reject_duplicate(&mut self, winner_path: &str, winner_weight: usize) {
        self.duplicate = true;
        self.reject(format!("DuplicateOf={winner_path} Weight={winner_weight}"));
    }

    /// Underlying directory entry.
    #[must_use]
    pub const fn entry(&self) -> &DirectoryEntry {
        &self.entry
    }

    /// Path of the entry (remote for listed items, local for merged ones).
    #[must_use]
    pub fn path(&self) -> &str {
        self.entry.path()
    }

    /// Computed local directory, once resolved.
    #[must_use]
    pub fn local_dir(&self) -> Option<&str> {
        self.local_dir.as_deref()
    }

    /// Whether the item is currently queued for transfer.
    #[must_use]
    pub const fn is_transfer(&self) -> bool {
        self.transfer
    }

    /// Reason for the current decision.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Whether the item lost a deduplication conflict.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        self.duplicate
    }

    /// Whether the item is a local copy merged into the queue.
    #[must_use]
    pub const fn is_merged(&self) -> bool {
        self.merged
    }

    /// Priority weight.
    #[must_use]
    pub const fn weight(&self) -> usize {
        self.weight
    }

    /// Parsed media descriptor.
    #[must_use]
    pub const fn media(&self) -> &MediaDescriptor {
        &self.media
    }

    /// Directory the transfer writes into. A local directory ending in `/`
    /// receives the entry as a subdirectory named after its base name.
    #[must_use]
    pub fn destination(&self) -> Option<PathBuf> {
        let local_dir = self.local_dir.as_deref()?;
        if local_dir.ends_with('/') {
            Some(Path::new(local_dir).join(self.entry.base()))
        } else {
            Some(PathBuf::from(local_dir))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryKind;
    use chrono::Utc;

    fn entry(path: &str) -> DirectoryEntry {
        DirectoryEntry::new(path, Utc::now(), EntryKind::Directory)
    }

    #[test]
    fn rejection_sticks() {
        let mut item = Item::new(
            entry("/tv/Show.S01E01"),
            Decision::Accept("Match=.*".to_string()),
            1,
        );
        assert!(item.is_transfer());
        item.reject("Age=2days MaxAge=1day");
        assert!(!item.is_transfer());
        assert_eq!(item.reason(), "Age=2days MaxAge=1day");
        item.reject("IsDstDirEmpty=false");
        assert!(!item.is_transfer());
    }

    #[test]
    fn duplicates_name_the_winner() {
        let mut item = Item::new(
            entry("/tv/Show.S01E01.720p"),
            Decision::Accept("Match=.*".to_string()),
            1,
        );
        item.reject_duplicate("/tv/Show.S01E01.1080p", 2);
        assert!(item.is_duplicate());
        assert!(!item.is_transfer());
        assert_eq!(item.reason(), "DuplicateOf=/tv/Show.S01E01.1080p Weight=2");
    }

    #[test]
    fn destination_follows_trailing_slash() {
        let mut item = Item::new(entry("/tv/Show.S01E01"), Decision::Accept(String::new()), 0);
        assert_eq!(item.destination(), None);

        item.local_dir = Some("/storage/Show/S01/".to_string());
        assert_eq!(
            item.destination(),
            Some(PathBuf::from("/storage/Show/S01/Show.S01E01"))
        );

        item.local_dir = Some("/storage/Show/S01".to_string());
        assert_eq!(item.destination(), Some(PathBuf::from("/storage/Show/S01")));
    }

    #[test]
    fn local_items_are_never_transferable() {
        let item = Item::local(entry("/storage/Show/S01/Show.S01E01.1080p"), MediaDescriptor::None, 2);
        assert!(!item.is_transfer());
        assert!(item.is_merged());
        assert!(!item.is_duplicate());
        assert_eq!(item.reason(), LOCAL_REASON);
        assert_eq!(item.local_dir(), Some("/storage/Show/S01/Show.S01E01.1080p"));
    }

    #[test]
    fn serializes_entry_fields_inline() {
        let item = Item::new(
            entry("/tv/Show.S01E01"),
            Decision::Reject("no match".to_string()),
            0,
        );
        let value = serde_json::to_value(&item).expect("item serializes");
        assert_eq!(value["path"], "/tv/Show.S01E01");
        assert_eq!(value["kind"], "directory");
        assert_eq!(value["transfer"], false);
        assert_eq!(value["reason"], "no match");
        assert_eq!(value["media"]["kind"], "none");
    }
}
