//! Error types for configuration loading and validation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::template::TemplateSyntaxError;

/// Primary error type for configuration operations.
///
/// File and document errors are fatal to the whole load. Site-level errors are
/// collected per site so callers can skip the broken site and continue.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration '{}'", path.display())]
    Io {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The configuration file is not a valid document.
    #[error("invalid configuration document '{}'", path.display())]
    Json {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// A required field is absent after defaults were applied.
    #[error("site '{site}' is missing required field '{field}'")]
    MissingField {
        /// Site name, or its position when the name itself is missing.
        site: String,
        /// Missing field.
        field: &'static str,
    },
    /// Two sites share the same name.
    #[error("site '{site}' is defined more than once")]
    DuplicateSite {
        /// Repeated site name.
        site: String,
    },
    /// A filter, accept, priority or replacement pattern failed to compile.
    #[error("invalid {field} pattern '{pattern}' in site '{site}'")]
    InvalidPattern {
        /// Site containing the pattern.
        site: String,
        /// Field holding the pattern.
        field: &'static str,
        /// Offending pattern.
        pattern: String,
        /// Underlying regex error.
        source: regex::Error,
    },
    /// A duration field could not be parsed.
    #[error("invalid duration '{value}' for '{field}' in site '{site}'")]
    InvalidDuration {
        /// Site containing the duration.
        site: String,
        /// Field holding the duration.
        field: &'static str,
        /// Offending value.
        value: String,
        /// Underlying parse error.
        source: humantime::DurationError,
    },
    /// The media parser kind is not recognised.
    #[error("unknown parser '{value}' in site '{site}' (expected 'show' or 'movie')")]
    InvalidParser {
        /// Site containing the parser kind.
        site: String,
        /// Offending value.
        value: String,
    },
    /// The local directory template is malformed.
    #[error("invalid local_dir template '{template}' in site '{site}'")]
    InvalidTemplate {
        /// Site containing the template.
        site: String,
        /// Offending template.
        template: String,
        /// Syntax error detail.
        source: TemplateSyntaxError,
    },
}

impl ConfigError {
    /// Name of the site the error belongs to, if it is site-scoped.
    #[must_use]
    pub fn site(&self) -> Option<&str> {
        match self {
            Self::Io { .. } | Self::Json { .. } => None,
            Self::MissingField { site, .. }
            | Self::DuplicateSite { site }
            | Self::InvalidPattern { site, .. }
            | Self::InvalidDuration { site, .. }
            | Self::InvalidParser { site, .. }
            | Self::InvalidTemplate { site, .. } => Some(site),
        }
    }
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn site_scoped_errors_report_their_site() {
        let err = ConfigError::InvalidParser {
            site: "tv".to_string(),
            value: "music".to_string(),
        };
        assert_eq!(err.site(), Some("tv"));
        assert!(err.to_string().contains("music"));
        assert!(err.source().is_none());
    }

    #[test]
    fn io_errors_keep_their_source() {
        let err = ConfigError::Io {
            path: PathBuf::from("/missing/.pullqrc"),
            source: io::Error::other("denied"),
        };
        assert_eq!(err.site(), None);
        assert_eq!(
            err.to_string(),
            "failed to read configuration '/missing/.pullqrc'"
        );
        assert!(err.source().is_some());
    }
}
