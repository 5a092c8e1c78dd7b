//! Queue assembly.
//!
//! # Design
//! - Stages run in a fixed order: rules, path resolution, local merge, sort,
//!   deduplication, then the age and destination checks on survivors only.
//! - Every stage after the rules can only reject, so a rejected item never
//!   becomes transferable again.
//! - A failing item is rejected with the error text and the build continues.

use std::time::Duration;

use chrono::{DateTime, Utc};
use pullq_config::{LocalDir, Site};
use tracing::{debug, info, warn};

use crate::dedup::deduplicate;
use crate::entry::DirectoryEntry;
use crate::filter::evaluate;
use crate::item::Item;
use crate::merge::merge;
use crate::priority::weight;
use crate::resolve::resolve;
use crate::storage::LocalStorage;

/// Reason recorded when the destination already has content.
pub const DESTINATION_OCCUPIED: &str = "IsDstDirEmpty=false";

/// The finished plan for one site.
#[derive(Debug, Clone)]
pub struct Queue {
    site: Site,
    items: Vec<Item>,
}

impl Queue {
    /// Build a queue from parsed listing entries.
    #[must_use]
    pub fn build(
        site: &Site,
        entries: Vec<DirectoryEntry>,
        storage: &dyn LocalStorage,
        now: DateTime<Utc>,
    ) -> Self {
        let mut items: Vec<Item> = entries
            .into_iter()
            .map(|entry| {
                let decision = evaluate(site, &entry);
                let entry_weight = weight(&site.priorities, entry.base());
                debug!(
                    site = %site.name,
                    path = entry.path(),
                    reason = decision.reason(),
                    "evaluated entry"
                );
                Item::new(entry, decision, entry_weight)
            })
            .collect();

        for item in &mut items {
            if item.is_transfer() {
                resolve(site, item);
            } else if let LocalDir::Fixed(path) = &site.local_dir {
                item.local_dir = Some(path.clone());
            }
        }

        if site.merge {
            merge(site, &mut items, storage);
        }

        items.sort_by(|a, b| {
            b.weight()
                .cmp(&a.weight())
                .then_with(|| a.path().cmp(b.path()))
        });

        if site.deduplicate {
            deduplicate(&mut items);
        }

        for item in items.iter_mut().filter(|item| item.is_transfer()) {
            check_survivor(site, item, storage, now);
        }

        let queue = Self {
            site: site.clone(),
            items,
        };
        info!(
            site = %site.name,
            items = queue.items.len(),
            transfer = queue.transferable().count(),
            duplicates = queue.items.iter().filter(|item| item.is_duplicate()).count(),
            merged = queue.items.iter().filter(|item| item.is_merged()).count(),
            "queue built"
        );
        queue
    }

    /// Build a queue from raw listing lines. Blank lines are ignored and
    /// malformed lines are logged and skipped.
    #[must_use]
    pub fn from_listing<I>(
        site: &Site,
        lines: I,
        storage: &dyn LocalStorage,
        now: DateTime<Utc>,
    ) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let entries = lines
            .into_iter()
            .filter_map(|line| {
                let line = line.as_ref().trim();
                if line.is_empty() {
                    return None;
                }
                match DirectoryEntry::parse(line) {
                    Ok(entry) => Some(entry),
                    Err(err) => {
                        warn!(site = %site.name, error = %err, "skipping listing line");
                        None
                    }
                }
            })
            .collect();
        Self::build(site, entries, storage, now)
    }

    /// Site the queue was built for.
    #[must_use]
    pub const fn site(&self) -> &Site {
        &self.site
    }

    /// Every item, rejected ones included, in queue order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Items queued for transfer, in queue order.
    pub fn transferable(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|item| item.is_transfer())
    }

    /// Whether nothing is queued for transfer.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transferable().next().is_none()
    }
}

fn check_survivor(site: &Site, item: &mut Item, storage: &dyn LocalStorage, now: DateTime<Utc>) {
    if let Some(max_age) = site.max_age {
        let age = item.entry().age(now);
        if age > max_age {
            let reason = format!(
                "Age={} MaxAge={}",
                humantime::format_duration(whole_seconds(age)),
                humantime::format_duration(whole_seconds(max_age))
            );
            debug!(site = %site.name, path = item.path(), %reason, "entry too old");
            item.reject(reason);
            return;
        }
    }

    if site.skip_existing
        && let Some(destination) = item.destination()
        && !storage.is_empty_dir(&destination)
    {
        debug!(
            site = %site.name,
            path = item.path(),
            destination = %destination.display(),
            "destination already has content"
        );
        item.reject(DESTINATION_OCCUPIED);
    }
}

const fn whole_seconds(duration: Duration) -> Duration {
    Duration::from_secs(duration.as_secs())
}
