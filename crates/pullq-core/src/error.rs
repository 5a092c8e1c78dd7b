//! Error types for queue construction.
//!
//! Every error here is local to one entry: the queue builder records the
//! `Display` text as the item's reason and carries on with the rest.

use thiserror::Error;

/// Convenience alias for parse results.
pub type ParseResult<T> = Result<T, ParseError>;

/// Failure to parse a listing line or a media name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The listing line does not have the expected shape.
    #[error("malformed listing line {line:?}: {reason}")]
    MalformedLine {
        /// Offending line.
        line: String,
        /// Static description of the problem.
        reason: &'static str,
    },
    /// The listing line carries an unparseable timestamp.
    #[error("invalid timestamp in listing line {line:?}: {source}")]
    InvalidTimestamp {
        /// Offending line.
        line: String,
        /// Underlying chrono error.
        source: chrono::ParseError,
    },
    /// No season/episode marker was found in a show name.
    #[error("failed to parse show from {name:?}: no season/episode marker")]
    NoEpisodeMarker {
        /// Directory base name.
        name: String,
    },
    /// No year marker was found in a movie name.
    #[error("failed to parse movie from {name:?}: no year marker")]
    NoYearMarker {
        /// Directory base name.
        name: String,
    },
}

/// Failure to render a local directory template for one item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// The placeholder names a field the item's descriptor does not have.
    #[error("template field {placeholder} is not available for {descriptor}")]
    FieldUnavailable {
        /// Placeholder as written in the template.
        placeholder: String,
        /// Kind of descriptor the item carries.
        descriptor: &'static str,
    },
}
