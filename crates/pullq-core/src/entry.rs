//! Remote directory entries and the listing line parser.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{ParseError, ParseResult};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// What a listed path refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// A directory.
    Directory,
    /// A symbolic link.
    Symlink,
    /// A regular file.
    File,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    path: String,
    modified: DateTime<Utc>,
    kind: EntryKind,
}

impl DirectoryEntry {
    /// Create an entry from its parts. Trailing slashes are removed from `path`.
    pub fn new(path: impl Into<String>, modified: DateTime<Utc>, kind: EntryKind) -> Self {
        let mut path = path.into();
        while path.len() > 1 && path.ends_with('/') {
            path.pop();
        }
        Self {
            path,
            modified,
            kind,
        }
    }

    /// Parse one trimmed, non-empty line of `cls --classify --date` output:
    ///
    /// ```text
    /// 2024-05-01 12:34:56 +0000 UTC /tv/Show.S01E01.720p/
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedLine`] when fields are missing and
    /// [`ParseError::InvalidTimestamp`] when the date cannot be parsed.
    pub fn parse(line: &str) -> ParseResult<Self> {
        let parts: Vec<&str> = line.splitn(5, ' ').collect();
        let [date, time, offset, _zone, path] = parts.as_slice() else {
            return Err(ParseError::MalformedLine {
                line: line.to_string(),
                reason: "expected date, time, offset, zone and path",
            });
        };

        let timestamp = format!("{date} {time} {offset}");
        let modified = DateTime::parse_from_str(&timestamp, TIMESTAMP_FORMAT)
            .map_err(|source| ParseError::InvalidTimestamp {
                line: line.to_string(),
                source,
            })?
            .with_timezone(&Utc);

        let path = path.trim();
        let (path, kind) = if let Some(path) = path.strip_suffix('/') {
            (path, EntryKind::Directory)
        } else if let Some(path) = path.strip_suffix('@') {
            (path, EntryKind::Symlink)
        } else {
            (path.strip_suffix('*').unwrap_or(path), EntryKind::File)
        };
        if path.is_empty() {
            return Err(ParseError::MalformedLine {
                line: line.to_string(),
                reason: "empty path",
            });
        }

        Ok(Self::new(path, modified, kind))
    }

    /// Full path of the entry.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last component of the path.
    #[must_use]
    pub fn base(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Modification time.
    #[must_use]
    pub const fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    /// Entry kind.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Whether the entry is a symbolic link.
    #[must_use]
    pub fn is_symlink(&self) -> bool {
        self.kind == EntryKind::Symlink
    }

    /// Whether the entry is a regular file.
    #[must_use]
    pub fn is_regular(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Time elapsed since the entry was modified, zero for future timestamps.
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.modified).to_std().unwrap_or_default()
    }
}
