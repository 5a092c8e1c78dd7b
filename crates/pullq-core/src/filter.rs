//! Ordered accept/reject rules.
//!
//! Rules run in a fixed order and the first decisive one wins: symlinks,
//! regular files, reject patterns, accept patterns, then the `no match`
//! fallback. Age and destination checks are not rules here; the queue builder
//! runs them after deduplication.

use pullq_config::Site;
use regex::Regex;

use crate::entry::DirectoryEntry;

/// Reason recorded when no rule matched.
pub const NO_MATCH: &str = "no match";

/// Outcome of running the rules against one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Queue the entry for transfer.
    Accept(String),
    /// Leave the entry out.
    Reject(String),
}

impl Decision {
    /// Whether the entry was accepted.
    #[must_use]
    pub const fn is_accept(&self) -> bool {
        matches!(self, Self::Accept(_))
    }

    /// Human-readable reason naming the deciding rule.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::Accept(reason) | Self::Reject(reason) => reason,
        }
    }
}

/// Evaluate the site's rules against `entry`.
#[must_use]
pub fn evaluate(site: &Site, entry: &DirectoryEntry) -> Decision {
    if site.skip_symlinks && entry.is_symlink() {
        return Decision::Reject(format!(
            "IsSymlink={} SkipSymlinks={}",
            entry.is_symlink(),
            site.skip_symlinks
        ));
    }
    if site.skip_files && entry.is_regular() {
        return Decision::Reject(format!(
            "IsFile={} SkipFiles={}",
            entry.is_regular(),
            site.skip_files
        ));
    }
    let name = entry.base();
    if let Some(pattern) = first_match(&site.filters, name) {
        return Decision::Reject(format!("Filter={pattern}"));
    }
    if let Some(pattern) = first_match(&site.patterns, name) {
        return Decision::Accept(format!("Match={pattern}"));
    }
    Decision::Reject(NO_MATCH.to_string())
}

fn first_match<'a>(patterns: &'a [Regex], name: &str) -> Option<&'a Regex> {
    patterns.iter().find(|pattern| pattern.is_match(name))
}
