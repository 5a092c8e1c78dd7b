//! Configuration documents and the compiled site model.
//!
//! # Design
//! - `*Document` types mirror the JSON file; every field is optional so that
//!   the `default` section can fill gaps.
//! - `Site` is the compiled, read-only form handed to the queue builder.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::template::PathTemplate;

/// Root of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigDocument {
    /// Settings for the external transfer client.
    #[serde(default)]
    pub client: ClientDocument,
    /// Values inherited by every site that does not set them.
    #[serde(default)]
    pub default: SiteDocument,
    /// Configured sites, in processing order.
    #[serde(default)]
    pub sites: Vec<SiteDocument>,
}

/// Client section of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientDocument {
    /// Path to the `lftp` executable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lftp_path: Option<String>,
    /// Transfer command used in queue lines (e.g. `mirror`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get_cmd: Option<String>,
}

/// Name rewrite as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplacementDocument {
    /// Regular expression to search for.
    pub pattern: String,
    /// Replacement text (supports `$1` style group references).
    pub replacement: String,
}

/// One site as written in the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteDocument {
    /// Site name, also passed to `open` in the transfer script.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Remote directories to list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dirs: Option<Vec<String>>,
    /// Maximum entry age in `humantime` syntax.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<String>,
    /// Reject patterns, evaluated in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<String>>,
    /// Accept patterns, evaluated in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<String>>,
    /// Priority patterns; earlier entries weigh more.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priorities: Option<Vec<String>>,
    /// Rewrites applied to parsed show names and movie titles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacements: Option<Vec<ReplacementDocument>>,
    /// Media parser kind: `show`, `movie`, or empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser: Option<String>,
    /// Fixed local directory, or a template when a parser is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_dir: Option<String>,
    /// Reject symlinked entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_symlinks: Option<bool>,
    /// Reject regular files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_files: Option<bool>,
    /// Reject entries whose destination already has content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_existing: Option<bool>,
    /// Merge local copies into deduplication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge: Option<bool>,
    /// Resolve duplicates by priority weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deduplicate: Option<bool>,
    /// Leave the site out of queue building.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<bool>,
    /// Command run after a successful transfer, with the report on stdin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_command: Option<String>,
}

impl SiteDocument {
    /// Fill every unset field from `defaults`. The site name is never inherited.
    #[must_use]
    pub fn inherit(self, defaults: &Self) -> Self {
        Self {
            name: self.name,
            dirs: self.dirs.or_else(|| defaults.dirs.clone()),
            max_age: self.max_age.or_else(|| defaults.max_age.clone()),
            filters: self.filters.or_else(|| defaults.filters.clone()),
            patterns: self.patterns.or_else(|| defaults.patterns.clone()),
            priorities: self.priorities.or_else(|| defaults.priorities.clone()),
            replacements: self.replacements.or_else(|| defaults.replacements.clone()),
            parser: self.parser.or_else(|| defaults.parser.clone()),
            local_dir: self.local_dir.or_else(|| defaults.local_dir.clone()),
            skip_symlinks: self.skip_symlinks.or(defaults.skip_symlinks),
            skip_files: self.skip_files.or(defaults.skip_files),
            skip_existing: self.skip_existing.or(defaults.skip_existing),
            merge: self.merge.or(defaults.merge),
            deduplicate: self.deduplicate.or(defaults.deduplicate),
            skip: self.skip.or(defaults.skip),
            post_command: self.post_command.or_else(|| defaults.post_command.clone()),
        }
    }
}

/// Resolved client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientSettings {
    /// Path to the `lftp` executable.
    pub lftp_path: String,
    /// Transfer command used in queue lines.
    pub get_cmd: String,
}

/// Which media descriptor a site extracts from entry names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// No parsing; the local directory is fixed.
    #[default]
    None,
    /// Series name, season and episode.
    Show,
    /// Title and year.
    Movie,
}

impl MediaKind {
    /// Lowercase name as written in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Show => "show",
            Self::Movie => "movie",
        }
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "none" => Ok(Self::None),
            "show" => Ok(Self::Show),
            "movie" => Ok(Self::Movie),
            other => Err(other.to_string()),
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compiled name rewrite.
#[derive(Debug, Clone)]
pub struct Replacement {
    /// Pattern to search for.
    pub pattern: Regex,
    /// Replacement text.
    pub replacement: String,
}

impl Replacement {
    /// Apply the rewrite to every match in `input`.
    #[must_use]
    pub fn apply(&self, input: &str) -> String {
        self.pattern
            .replace_all(input, self.replacement.as_str())
            .into_owned()
    }
}

/// Where accepted entries are stored locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalDir {
    /// The same directory for every entry.
    Fixed(String),
    /// Rendered from each entry's media descriptor.
    Template(PathTemplate),
}

impl LocalDir {
    /// Directory or template text as configured.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Fixed(path) => path,
            Self::Template(template) => template.as_str(),
        }
    }
}

/// Read-only site configuration used for one queue build.
#[derive(Debug, Clone)]
pub struct Site {
    /// Site name.
    pub name: String,
    /// Remote directories to list.
    pub dirs: Vec<String>,
    /// Entries older than this are not transferred. `None` disables the check.
    pub max_age: Option<Duration>,
    /// Reject patterns, evaluated in order.
    pub filters: Vec<Regex>,
    /// Accept patterns, evaluated in order.
    pub patterns: Vec<Regex>,
    /// Priority patterns; the first match determines the weight.
    pub priorities: Vec<Regex>,
    /// Rewrites applied to parsed names.
    pub replacements: Vec<Replacement>,
    /// Media parser kind.
    pub parser: MediaKind,
    /// Local destination.
    pub local_dir: LocalDir,
    /// Transfer command used in queue lines.
    pub get_cmd: String,
    /// Reject symlinked entries.
    pub skip_symlinks: bool,
    /// Reject regular files.
    pub skip_files: bool,
    /// Reject entries whose destination already has content.
    pub skip_existing: bool,
    /// Merge local copies into deduplication.
    pub merge: bool,
    /// Resolve duplicates by priority weight.
    pub deduplicate: bool,
    /// Leave the site out of queue building.
    pub skip: bool,
    /// Post-transfer command split into program and arguments.
    pub post_command: Option<Vec<String>>,
}
