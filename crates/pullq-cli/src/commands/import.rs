//! `--import`: build queues from `<site> <path>` lines instead of listings.

use std::io::BufRead;

use chrono::{DateTime, Utc};
use pullq_config::Site;
use pullq_core::{DirectoryEntry, EntryKind};
use tracing::warn;

/// Group imported paths by site, in configuration order. Imported paths are
/// treated as directories modified at `now`.
pub(crate) fn read_import<R: BufRead>(
    reader: R,
    sites: &[Site],
    now: DateTime<Utc>,
) -> anyhow::Result<Vec<(Site, Vec<DirectoryEntry>)>> {
    let mut grouped: Vec<Vec<DirectoryEntry>> = vec![Vec::new(); sites.len()];
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((name, path)) = line.split_once(char::is_whitespace) else {
            warn!(line, "import line has no path");
            continue;
        };
        let Some(index) = sites.iter().position(|site| site.name == name) else {
            warn!(site = name, "import names an unknown site");
            continue;
        };
        grouped[index].push(DirectoryEntry::new(
            path.trim(),
            now,
            EntryKind::Directory,
        ));
    }

    Ok(sites
        .iter()
        .zip(grouped)
        .filter(|(_, entries)| !entries.is_empty())
        .map(|(site, entries)| (site.clone(), entries))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pullq_test_support::fixtures::{compile_site, site_document};

    #[test]
    fn groups_lines_by_configured_site() -> anyhow::Result<()> {
        let sites = vec![
            compile_site(site_document("tv")),
            compile_site(site_document("movies")),
        ];
        let input = "movies /movies/Heat.1995\n\ntv /tv/Show.S01E01\nnope /x\nlonely\ntv /tv/Show With Spaces\n";
        let batches = read_import(input.as_bytes(), &sites, Utc::now())?;

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].0.name, "tv");
        let paths: Vec<&str> = batches[0].1.iter().map(DirectoryEntry::path).collect();
        assert_eq!(paths, vec!["/tv/Show.S01E01", "/tv/Show With Spaces"]);
        assert_eq!(batches[1].0.name, "movies");
        assert_eq!(batches[1].1[0].kind(), EntryKind::Directory);
        Ok(())
    }

    #[test]
    fn empty_input_builds_nothing() -> anyhow::Result<()> {
        let sites = vec![compile_site(site_document("tv"))];
        assert!(read_import("".as_bytes(), &sites, Utc::now())?.is_empty());
        Ok(())
    }
}
