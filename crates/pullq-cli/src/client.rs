//! lftp invocation and CLI error types.

use std::fmt::{self, Display, Formatter};
use std::io::Write as _;
use std::process::Stdio;

use anyhow::{Context, bail, ensure};
use pullq_core::quote;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::debug;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

/// `err` followed by its sources, `: `-separated.
pub(crate) fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// lftp command text that prints a classified, dated listing of `dir`.
pub(crate) fn list_command(site: &str, dir: &str) -> String {
    format!(
        "open {} && cls --classify --date --time-style='%F %T %z %Z' {} && exit",
        quote(site),
        quote(dir)
    )
}

pub(crate) fn output_stdio(quiet: bool) -> Stdio {
    if quiet { Stdio::null() } else { Stdio::inherit() }
}

/// Handle on the lftp executable.
#[derive(Debug, Clone)]
pub(crate) struct Lftp {
    path: String,
    quiet: bool,
}

impl Lftp {
    pub(crate) fn new(path: impl Into<String>, quiet: bool) -> Self {
        Self {
            path: path.into(),
            quiet,
        }
    }

    /// Raw listing lines for `dir` on `site`.
    pub(crate) async fn list(&self, site: &str, dir: &str) -> anyhow::Result<Vec<String>> {
        let command = list_command(site, dir);
        debug!(site, dir, lftp = %self.path, "listing remote directory");
        let output = Command::new(&self.path)
            .arg("-e")
            .arg(&command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(output_stdio(self.quiet))
            .output()
            .await
            .with_context(|| format!("failed to run {}", self.path))?;
        if !output.status.success() {
            bail!("{} exited with {}", self.path, output.status);
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect())
    }

    /// Run `script` with `lftp -f`.
    pub(crate) async fn transfer(&self, script: &str) -> anyhow::Result<()> {
        let mut file = NamedTempFile::new().context("failed to create script file")?;
        file.write_all(script.as_bytes())
            .and_then(|()| file.flush())
            .context("failed to write script file")?;
        debug!(script = %file.path().display(), lftp = %self.path, "starting transfer");

        let status = Command::new(&self.path)
            .arg("-f")
            .arg(file.path())
            .stdin(Stdio::null())
            .stdout(output_stdio(self.quiet))
            .stderr(output_stdio(self.quiet))
            .status()
            .await
            .with_context(|| format!("failed to run {}", self.path))?;
        ensure!(status.success(), "{} exited with {status}", self.path);
        Ok(())
    }
}
