//! Argument parsing and command dispatch.

use std::io;
use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, ValueEnum};
use pullq_config::{default_path, load};
use pullq_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use tracing::{Instrument, info_span};
use uuid::Uuid;

use crate::client::{CliError, CliResult, Lftp, error_chain};
use crate::commands::config::handle_config_test;
use crate::commands::import::read_import;
use crate::commands::listing::list_sites;
use crate::commands::queue::{QueueContext, handle_queues, queues_from_import, queues_from_listings};
use crate::output::Reporter;

/// Log level used with `--quiet` when no level is given.
const QUIET_LOG_LEVEL: &str = "warn";

/// Parses CLI arguments, runs the requested mode and returns the process exit
/// code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let level = cli.log_level.clone().unwrap_or_else(|| {
        if cli.quiet {
            QUIET_LOG_LEVEL.to_string()
        } else {
            DEFAULT_LOG_LEVEL.to_string()
        }
    });
    let logging = LoggingConfig {
        level: &level,
        format: cli.log_format.unwrap_or_else(LogFormat::infer),
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("error: {err:#}");
        return CliError::failure(err).exit_code();
    }

    let run_id = Uuid::new_v4();
    let result = dispatch(cli).instrument(info_span!("run", %run_id)).await;
    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli) -> CliResult<()> {
    let path = cli.config.clone().or_else(default_path).ok_or_else(|| {
        CliError::validation("no configuration file (pass --config or set PULLQ_CONFIG)")
    })?;
    let config = load(&path).map_err(|err| CliError::validation(error_chain(&err)))?;

    if cli.test {
        return handle_config_test(&config);
    }

    let reporter = Reporter::new(cli.quiet);
    for err in &config.invalid {
        reporter.error(&format!("skipping invalid site: {}", error_chain(err)));
    }

    let lftp_path = cli.lftp.unwrap_or_else(|| config.client.lftp_path.clone());
    let ctx = QueueContext {
        lftp: Lftp::new(lftp_path, cli.quiet),
        reporter,
        quiet: cli.quiet,
        dryrun: cli.dryrun.then_some(cli.format),
    };

    let queues = if cli.import {
        let batches = read_import(io::stdin().lock(), &config.sites, Utc::now())
            .map_err(|err| CliError::failure(err.context("failed to read import from stdin")))?;
        queues_from_import(batches)
    } else {
        queues_from_listings(list_sites(&ctx.lftp, &config.sites, reporter).await)
    };
    handle_queues(&ctx, &queues).await
}

/// Output format for dry runs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Lftp,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "pullq",
    about = "Build lftp transfer queues from remote listings and run them"
)]
pub(crate) struct Cli {
    #[arg(
        short = 'f',
        long = "config",
        env = "PULLQ_CONFIG",
        value_name = "FILE",
        help = "Path to config (defaults to ~/.pullqrc)"
    )]
    config: Option<PathBuf>,
    #[arg(short = 'n', long, help = "Print queues instead of transferring")]
    dryrun: bool,
    #[arg(
        short = 'F',
        long,
        value_enum,
        default_value_t = OutputFormat::Lftp,
        help = "Format to use in dryrun mode"
    )]
    format: OutputFormat,
    #[arg(short = 't', long, help = "Test and print config")]
    test: bool,
    #[arg(short = 'q', long, help = "Do not print output from lftp")]
    quiet: bool,
    #[arg(short = 'i', long, help = "Build queues from `<site> <path>` lines on stdin")]
    import: bool,
    #[arg(short = 'p', long = "lftp", value_name = "PATH", help = "Path to lftp program")]
    lftp: Option<String>,
    #[arg(long, env = "PULLQ_LOG_LEVEL", help = "Log level (RUST_LOG takes precedence)")]
    log_level: Option<String>,
    #[arg(long, value_parser = parse_log_format, help = "Log format: pretty or json")]
    log_format: Option<LogFormat>,
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    value
        .parse::<LogFormat>()
        .map_err(|err| err.to_string())
}
