//! Post-transfer hook.

use std::io;
use std::process::Stdio;

use anyhow::{Context, bail, ensure};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::client::output_stdio;

/// Run `argv` with `report` on stdin and wait for it to exit successfully.
/// A command that exits without reading its stdin is not an error by itself.
pub(crate) async fn run_post_command(
    argv: &[String],
    report: &[u8],
    quiet: bool,
) -> anyhow::Result<()> {
    let Some((program, args)) = argv.split_first() else {
        bail!("post command is empty");
    };
    debug!(program = %program, "running post command");
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(output_stdio(quiet))
        .stderr(output_stdio(quiet))
        .spawn()
        .with_context(|| format!("failed to start post command {program}"))?;

    if let Some(mut stdin) = child.stdin.take()
        && let Err(err) = stdin.write_all(report).await
        && err.kind() != io::ErrorKind::BrokenPipe
    {
        return Err(err).with_context(|| format!("failed to write report to {program}"));
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("failed to wait for post command {program}"))?;
    ensure!(status.success(), "post command {program} exited with {status}");
    Ok(())
}
