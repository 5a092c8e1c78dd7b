//! Concurrent remote listing of every active site.

use pullq_config::Site;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::client::Lftp;
use crate::output::Reporter;

/// Listing lines of one site, all of its dirs concatenated.
pub(crate) struct SiteListing {
    pub(crate) site: Site,
    pub(crate) lines: Vec<String>,
}

/// List every site that is not skipped, one task per site. A dir that fails
/// to list is reported and left out; the site's other dirs still count.
pub(crate) async fn list_sites(lftp: &Lftp, sites: &[Site], reporter: Reporter) -> Vec<SiteListing> {
    let mut tasks = JoinSet::new();
    for (position, site) in sites.iter().enumerate() {
        if site.skip {
            info!(site = %site.name, "site skipped");
            reporter.info(&format!("skipping site {}", site.name));
            continue;
        }
        let lftp = lftp.clone();
        let site = site.clone();
        tasks.spawn(async move {
            let mut lines = Vec::new();
            for dir in &site.dirs {
                match lftp.list(&site.name, dir).await {
                    Ok(listed) => lines.extend(listed),
                    Err(err) => {
                        error!(site = %site.name, dir = %dir, error = %format!("{err:#}"), "listing failed");
                        reporter.error(&format!(
                            "error while listing {dir} on {}: {err:#}",
                            site.name
                        ));
                    }
                }
            }
            (position, SiteListing { site, lines })
        });
    }

    let mut listings = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(listing) => listings.push(listing),
            Err(err) => error!(error = %err, "listing task failed"),
        }
    }
    listings.sort_by_key(|(position, _)| *position);
    listings.into_iter().map(|(_, listing)| listing).collect()
}
