#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(missing_docs, unreachable_pub)]
#![allow(clippy::module_name_repetitions)]

//! Site configuration for building transfer queues.
//!
//! Layout: `model.rs` (serde documents and compiled `Site` values),
//! `template.rs` (local directory template syntax), `validate.rs`
//! (compilation of documents into sites), `loader.rs` (reading the
//! configuration file and applying defaults), `defaults.rs` (fallback values).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod template;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{Config, default_path, load, parse};
pub use model::{
    ClientDocument, ClientSettings, ConfigDocument, LocalDir, MediaKind, Replacement,
    ReplacementDocument, Site, SiteDocument,
};
pub use template::{
    FieldName, FieldScope, MAX_PLACEHOLDER_WIDTH, PathTemplate, Placeholder, Segment,
    TemplateSyntaxError,
};
