#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::redundant_pub_crate)]

//! Command-line front end that lists remote sites with lftp, builds transfer
//! queues and runs them.
//!
//! Layout:
//! - `cli.rs`: argument parsing and command dispatch
//! - `commands/`: listing, import, queue processing, post commands and config test
//! - `client.rs`: lftp invocation and CLI errors
//! - `output.rs`: queue renderers and user-facing messages
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod output;

pub use cli::run;
