//! Fixture builders for sites, listings and local directory trees.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use pullq_config::validate::compile_site as compile;
use pullq_config::{ClientSettings, Site, SiteDocument};
use tempfile::TempDir;

/// Format one listing line the way `cls --classify --date` prints it.
#[must_use]
pub fn listing_line(modified: DateTime<Utc>, path: &str) -> String {
    format!("{} +0000 UTC {path}", modified.format("%Y-%m-%d %H:%M:%S"))
}

/// A minimal site document: name, `/tv` as the remote dir and a fixed
/// `/srv/tv/` local directory. No patterns, so nothing is accepted yet.
#[must_use]
pub fn site_document(name: &str) -> SiteDocument {
    SiteDocument {
        name: Some(name.to_string()),
        dirs: Some(vec!["/tv".to_string()]),
        local_dir: Some("/srv/tv/".to_string()),
        ..SiteDocument::default()
    }
}

/// Client settings with stock `lftp` and `mirror`.
#[must_use]
pub fn client_settings() -> ClientSettings {
    ClientSettings {
        lftp_path: "lftp".to_string(),
        get_cmd: "mirror".to_string(),
    }
}

/// Compile a document into a site.
///
/// # Panics
///
/// Panics when the document is invalid.
#[must_use]
pub fn compile_site(document: SiteDocument) -> Site {
    match compile(&document, &client_settings(), 0) {
        Ok(site) => site,
        Err(err) => panic!("fixture site is invalid: {err}"),
    }
}

/// A temporary local storage tree, removed on drop.
#[derive(Debug)]
pub struct LocalTree {
    dir: TempDir,
}

impl LocalTree {
    /// Create an empty tree.
    ///
    /// # Panics
    ///
    /// Panics when the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        match TempDir::new() {
            Ok(dir) => Self { dir },
            Err(err) => panic!("failed to create temp dir: {err}"),
        }
    }

    /// Root of the tree.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Create a directory (and its parents) relative to the root.
    ///
    /// # Panics
    ///
    /// Panics when the directory cannot be created.
    pub fn mkdir(&self, relative: &str) {
        let path = self.dir.path().join(relative);
        if let Err(err) = fs::create_dir_all(&path) {
            panic!("failed to create {}: {err}", path.display());
        }
    }

    /// Create an empty file (and its parents) relative to the root.
    ///
    /// # Panics
    ///
    /// Panics when the file cannot be written.
    pub fn touch(&self, relative: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            self.mkdir_abs(parent);
        }
        if let Err(err) = fs::write(&path, b"") {
            panic!("failed to write {}: {err}", path.display());
        }
    }

    fn mkdir_abs(&self, path: &Path) {
        if let Err(err) = fs::create_dir_all(path) {
            panic!("failed to create {} under {}: {err}", path.display(), self.root().display());
        }
    }
}

impl Default for LocalTree {
    fn default() -> Self {
        Self::new()
    }
}
