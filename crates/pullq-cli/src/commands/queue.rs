//! Queue processing: dry-run rendering or transfer plus post command.

use anyhow::{Context, anyhow};
use chrono::Utc;
use pullq_config::Site;
use pullq_core::{DirectoryEntry, FsStorage, Queue, report_bytes, script};
use tracing::{error, info};

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult, Lftp};
use crate::commands::listing::SiteListing;
use crate::commands::post::run_post_command;
use crate::output::{Reporter, render_queue};

/// What to do with each finished queue.
#[derive(Debug, Clone)]
pub(crate) struct QueueContext {
    pub(crate) lftp: Lftp,
    pub(crate) reporter: Reporter,
    pub(crate) quiet: bool,
    pub(crate) dryrun: Option<OutputFormat>,
}

pub(crate) fn queues_from_listings(listings: Vec<SiteListing>) -> Vec<Queue> {
    let now = Utc::now();
    listings
        .into_iter()
        .map(|listing| Queue::from_listing(&listing.site, &listing.lines, &FsStorage, now))
        .collect()
}

pub(crate) fn queues_from_import(batches: Vec<(Site, Vec<DirectoryEntry>)>) -> Vec<Queue> {
    let now = Utc::now();
    batches
        .into_iter()
        .map(|(site, entries)| Queue::build(&site, entries, &FsStorage, now))
        .collect()
}

/// Handle every queue in order. A failing queue is reported and the rest
/// still run; the overall result fails if any queue did.
pub(crate) async fn handle_queues(ctx: &QueueContext, queues: &[Queue]) -> CliResult<()> {
    let mut failed = 0usize;
    for queue in queues {
        if let Err(err) = handle_queue(ctx, queue).await {
            failed += 1;
            let site = &queue.site().name;
            error!(site = %site, error = %format!("{err:#}"), "queue failed");
            ctx.reporter
                .error(&format!("error while processing queue for {site}: {err:#}"));
        }
    }
    if failed == 0 {
        Ok(())
    } else {
        Err(CliError::failure(anyhow!("{failed} queue(s) failed")))
    }
}

async fn handle_queue(ctx: &QueueContext, queue: &Queue) -> anyhow::Result<()> {
    let site = queue.site();
    if let Some(format) = ctx.dryrun {
        print!("{}", render_queue(queue, format)?);
        return Ok(());
    }
    if queue.is_empty() {
        ctx.reporter.info(&format!("{} queue is empty", site.name));
        return Ok(());
    }

    info!(site = %site.name, items = queue.transferable().count(), "starting transfer");
    ctx.lftp
        .transfer(&script(queue))
        .await
        .with_context(|| format!("transfer for {} failed", site.name))?;

    if let Some(command) = &site.post_command {
        let report = report_bytes(queue).context("failed to serialize report")?;
        run_post_command(command, &report, ctx.quiet).await?;
    }
    Ok(())
}
