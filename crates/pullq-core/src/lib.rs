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

//! Transfer queue construction.
//!
//! A remote listing goes in, a [`Queue`] comes out: every listed entry with
//! its decision, reason, local directory and duplicate status.
//!
//! Layout: `entry.rs` (listing line parser), `media.rs` (show and movie
//! descriptors), `filter.rs` (accept/reject rules), `priority.rs` (weights),
//! `resolve.rs` (local directory templating), `merge.rs` (local duplicate
//! discovery), `dedup.rs` (weighted deduplication), `queue.rs` (assembly),
//! `output.rs` (lftp script and JSON report), `storage.rs` (local
//! filesystem port).

mod dedup;
pub mod entry;
pub mod error;
pub mod filter;
pub mod item;
pub mod media;
pub mod merge;
pub mod output;
pub mod priority;
pub mod queue;
pub mod resolve;
pub mod storage;

pub use entry::{DirectoryEntry, EntryKind};
pub use error::{ParseError, ParseResult, TemplateError};
pub use filter::{Decision, NO_MATCH, evaluate};
pub use item::{Item, LOCAL_REASON};
pub use media::{MediaDescriptor, Movie, Show};
pub use merge::local_duplicates;
pub use output::{quote, report, report_bytes, script};
pub use priority::weight;
pub use queue::{DESTINATION_OCCUPIED, Queue};
pub use resolve::{render, resolve};
pub use storage::{FsStorage, LocalStorage};
