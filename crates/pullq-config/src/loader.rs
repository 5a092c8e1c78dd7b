//! Reading the configuration file and compiling its sites.
//!
//! # Design
//! - File and document errors abort the load.
//! - Site errors are collected so one broken site does not block the others.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::defaults;
use crate::error::{ConfigError, ConfigResult};
use crate::model::{ClientSettings, ConfigDocument, Site, SiteDocument};
use crate::validate::compile_site;

/// Loaded configuration.
#[derive(Debug)]
pub struct Config {
    /// Resolved client settings.
    pub client: ClientSettings,
    /// Sites that compiled successfully, in file order.
    pub sites: Vec<Site>,
    /// Errors for sites that failed to compile and must be skipped.
    pub invalid: Vec<ConfigError>,
    /// Site documents after defaults were applied.
    pub merged: Vec<SiteDocument>,
}

impl Config {
    /// Compile a parsed document.
    #[must_use]
    pub fn from_document(document: ConfigDocument) -> Self {
        let client = ClientSettings {
            lftp_path: document
                .client
                .lftp_path
                .unwrap_or_else(|| defaults::LFTP_PATH.to_string()),
            get_cmd: document
                .client
                .get_cmd
                .unwrap_or_else(|| defaults::GET_CMD.to_string()),
        };

        let merged: Vec<SiteDocument> = document
            .sites
            .into_iter()
            .map(|site| site.inherit(&document.default))
            .collect();

        let mut sites = Vec::with_capacity(merged.len());
        let mut invalid = Vec::new();
        let mut seen = HashSet::new();
        for (position, site) in merged.iter().enumerate() {
            match compile_site(site, &client, position) {
                Ok(site) if !seen.insert(site.name.clone()) => {
                    invalid.push(ConfigError::DuplicateSite { site: site.name });
                }
                Ok(site) => sites.push(site),
                Err(err) => invalid.push(err),
            }
        }

        for err in &invalid {
            warn!(site = err.site().unwrap_or_default(), error = %err, "invalid site configuration");
        }
        debug!(
            sites = sites.len(),
            invalid = invalid.len(),
            "compiled configuration"
        );

        Self {
            client,
            sites,
            invalid,
            merged,
        }
    }

    /// Merged site documents rendered as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.merged)
    }
}

/// Parse configuration text. `origin` is only used in error messages.
///
/// # Errors
///
/// Returns [`ConfigError::Json`] if the text is not a valid document.
pub fn parse(text: &str, origin: &Path) -> ConfigResult<Config> {
    let document: ConfigDocument =
        serde_json::from_str(text).map_err(|source| ConfigError::Json {
            path: origin.to_path_buf(),
            source,
        })?;
    Ok(Config::from_document(document))
}

/// Read and compile the configuration file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Json`] if it is not a valid document.
pub fn load(path: &Path) -> ConfigResult<Config> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text, path)
}

/// Default configuration path (`$HOME/.pullqrc`), if a home directory is known.
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(defaults::CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn duplicate_site_names_are_reported() {
        let text = json!({
            "sites": [
                { "name": "tv", "dirs": ["/a"], "local_dir": "/tmp/a" },
                { "name": "tv", "dirs": ["/b"], "local_dir": "/tmp/b" }
            ]
        })
        .to_string();
        let config = parse(&text, Path::new("inline")).expect("document parses");
        assert_eq!(config.sites.len(), 1);
        assert_eq!(config.sites[0].dirs, vec!["/a".to_string()]);
        assert!(matches!(
            config.invalid.as_slice(),
            [ConfigError::DuplicateSite { site }] if site == "tv"
        ));
    }

    #[test]
    fn client_defaults_apply() {
        let config = parse("{}", Path::new("inline")).expect("document parses");
        assert_eq!(config.client.lftp_path, "lftp");
        assert_eq!(config.client.get_cmd, "mirror");
        assert!(config.sites.is_empty());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = parse(r#"{"sitez": []}"#, Path::new("inline")).expect_err("unknown field");
        assert!(matches!(err, ConfigError::Json { .. }));
    }

    #[test]
    fn default_path_points_into_home() {
        if let Some(path) = default_path() {
            assert!(path.ends_with(".pullqrc"));
        }
    }
}
