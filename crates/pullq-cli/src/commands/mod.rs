//! Command handlers grouped by concern.

pub(crate) mod config;
pub(crate) mod import;
pub(crate) mod listing;
pub(crate) mod post;
pub(crate) mod queue;
