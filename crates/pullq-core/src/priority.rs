//! Priority weights.

use regex::Regex;

/// Weight of `name` against an ordered priority list: `len - index` of the
/// first matching pattern, or 0 when nothing matches. Higher weighs more.
#[must_use]
pub fn weight(priorities: &[Regex], name: &str) -> usize {
    priorities
        .iter()
        .position(|pattern| pattern.is_match(name))
        .map_or(0, |index| priorities.len() - index)
}
