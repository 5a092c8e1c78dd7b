//! Queue renderers and user-facing messages.

use anyhow::Context;
use pullq_core::{Queue, report, script};

use crate::cli::OutputFormat;

/// Render a queue for dry runs.
pub(crate) fn render_queue(queue: &Queue, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Lftp => Ok(script(queue)),
        OutputFormat::Json => {
            let mut text = report(queue).context("failed to format JSON")?;
            text.push('\n');
            Ok(text)
        }
    }
}

/// Prints status lines on stderr. Errors are printed even when quiet.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Reporter {
    quiet: bool,
}

impl Reporter {
    pub(crate) const fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub(crate) fn info(self, message: &str) {
        if !self.quiet {
            eprintln!("pullq: {message}");
        }
    }

    pub(crate) fn error(self, message: &str) {
        eprintln!("pullq: {message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pullq_core::{DirectoryEntry, EntryKind, FsStorage};
    use pullq_test_support::fixtures::{compile_site, site_document};

    fn queue() -> Queue {
        let mut document = site_document("tv");
        document.patterns = Some(vec![".*".to_string()]);
        let site = compile_site(document);
        let entries = vec![DirectoryEntry::new(
            "/tv/Show.S01E01",
            Utc::now(),
            EntryKind::Directory,
        )];
        Queue::build(&site, entries, &FsStorage, Utc::now())
    }

    #[test]
    fn lftp_format_renders_script() -> anyhow::Result<()> {
        let text = render_queue(&queue(), OutputFormat::Lftp)?;
        assert!(text.starts_with("open tv\nqueue mirror /tv/Show.S01E01 /srv/tv/\n"));
        Ok(())
    }

    #[test]
    fn json_format_ends_with_newline() -> anyhow::Result<()> {
        let text = render_queue(&queue(), OutputFormat::Json)?;
        assert!(text.ends_with("]\n"));
        let value: serde_json::Value = serde_json::from_str(&text)?;
        assert_eq!(value[0]["transfer"], true);
        Ok(())
    }
}
