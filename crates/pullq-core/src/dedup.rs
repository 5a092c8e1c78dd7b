//! Weighted deduplication.
//!
//! Competitors are the transferable items and the merged local copies. Within
//! a group of equal media descriptors the winner is the maximum of
//! (weight, local over remote, lexically smaller path); every other
//! transferable member is rejected as its duplicate. Merged local copies can
//! win a group but are never marked themselves. List position never matters.

use std::cmp::Ordering;

use tracing::debug;

use crate::item::Item;

fn competes(item: &Item) -> bool {
    (item.is_transfer() || item.is_merged()) && !item.is_duplicate()
}

fn rank_cmp(a: &Item, b: &Item) -> Ordering {
    a.weight()
        .cmp(&b.weight())
        .then_with(|| a.is_merged().cmp(&b.is_merged()))
        .then_with(|| b.path().cmp(a.path()))
}

/// Reject every transferable competitor outranked by an equal-media
/// competitor with a different path.
pub(crate) fn deduplicate(items: &mut [Item]) {
    let competitors: Vec<usize> = (0..items.len()).filter(|&i| competes(&items[i])).collect();

    let mut losers = Vec::new();
    for &i in &competitors {
        let item = &items[i];
        if item.is_merged() {
            continue;
        }
        let winner = competitors
            .iter()
            .map(|&j| &items[j])
            .filter(|other| other.path() != item.path() && other.media().same_media(item.media()))
            .max_by(|a, b| rank_cmp(a, b));
        if let Some(winner) = winner.filter(|winner| rank_cmp(winner, item).is_gt()) {
            losers.push((i, winner.path().to_string(), winner.weight()));
        }
    }

    for (i, winner_path, winner_weight) in losers {
        let item = &mut items[i];
        debug!(
            path = item.path(),
            weight = item.weight(),
            winner = %winner_path,
            winner_weight,
            "rejected duplicate"
        );
        item.reject_duplicate(&winner_path, winner_weight);
    }
}
