//! Local duplicate discovery.
//!
//! For an accepted item with destination `D`, the directory scanned is `D`
//! itself when it ends in `/` (the item lands inside it) and the parent of `D`
//! otherwise. Child directories there that parse to the same media as the
//! candidate become local items: never transferred, but able to outrank a
//! remote duplicate during deduplication.

use std::collections::HashSet;
use std::path::Path;

use pullq_config::Site;
use tracing::debug;

use crate::entry::EntryKind;
use crate::item::Item;
use crate::media::MediaDescriptor;
use crate::priority::weight;
use crate::storage::LocalStorage;

/// Local copies that could stand in for `candidate`.
#[must_use]
pub fn local_duplicates(site: &Site, candidate: &Item, storage: &dyn LocalStorage) -> Vec<Item> {
    let Some(local_dir) = candidate.local_dir() else {
        return Vec::new();
    };
    let container = if local_dir.ends_with('/') {
        Path::new(local_dir)
    } else {
        match Path::new(local_dir).parent() {
            Some(parent) => parent,
            None => return Vec::new(),
        }
    };

    let entries = match storage.list_entries(container) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(dir = %container.display(), error = %err, "local directory not readable");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter(|entry| entry.kind() == EntryKind::Directory)
        .filter(|entry| entry.base() != candidate.entry().base())
        .filter_map(|entry| {
            let media =
                MediaDescriptor::parse(entry.base(), site.parser, &site.replacements).ok()?;
            if !media.same_media(candidate.media()) {
                return None;
            }
            let local_weight = weight(&site.priorities, entry.base());
            Some(Item::local(entry, media, local_weight))
        })
        .collect()
}

/// Append local duplicates of every transferable item to `items`.
pub(crate) fn merge(site: &Site, items: &mut Vec<Item>, storage: &dyn LocalStorage) {
    let mut seen: HashSet<String> = items.iter().map(|item| item.path().to_string()).collect();
    let mut merged = Vec::new();
    for candidate in items.iter().filter(|item| item.is_transfer()) {
        for local in local_duplicates(site, candidate, storage) {
            if seen.insert(local.path().to_string()) {
                debug!(path = local.path(), duplicate_of = candidate.path(), "merged local copy");
                merged.push(local);
            }
        }
    }
    items.extend(merged);
}
