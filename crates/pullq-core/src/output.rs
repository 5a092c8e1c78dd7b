//! Queue renderers: an lftp script and a JSON report.

use std::fmt::Write as _;

use crate::queue::Queue;

/// Render the transferable items as an lftp script.
#[must_use]
pub fn script(queue: &Queue) -> String {
    let site = queue.site();
    let mut out = String::new();
    let _ = writeln!(out, "open {}", quote(&site.name));
    for item in queue.transferable() {
        let _ = writeln!(
            out,
            "queue {} {} {}",
            site.get_cmd,
            quote(item.path()),
            quote(item.local_dir().unwrap_or_default())
        );
    }
    out.push_str("queue start\nwait\nexit\n");
    out
}

/// Render every item, rejected ones included, as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn report(queue: &Queue) -> serde_json::Result<String> {
    serde_json::to_string_pretty(queue.items())
}

/// Compact JSON report, as fed to post commands.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn report_bytes(queue: &Queue) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(queue.items())
}

/// Quote `word` as a single lftp command argument.
///
/// Words made only of `[A-Za-z0-9._/+:@,=-]` pass through unchanged. Anything
/// else is double-quoted with `"` and `\` escaped, so lftp separators such as
/// `;`, `&`, `|`, `>` and a leading `!` stay part of the word.
#[must_use]
pub fn quote(word: &str) -> String {
    let plain = !word.is_empty() && word.chars().all(is_plain);
    if plain {
        return word.to_string();
    }
    let mut quoted = String::with_capacity(word.len() + 2);
    quoted.push('"');
    for c in word.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

const fn is_plain(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '/' | '+' | ':' | '@' | ',' | '=' | '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{DirectoryEntry, EntryKind};
    use crate::storage::LocalStorage;
    use chrono::Utc;
    use pullq_test_support::fixtures::{compile_site, site_document};
    use std::io;
    use std::path::Path;

    struct Nothing;

    impl LocalStorage for Nothing {
        fn list_entries(&self, _dir: &Path) -> io::Result<Vec<DirectoryEntry>> {
            Ok(Vec::new())
        }

        fn is_empty_dir(&self, _dir: &Path) -> bool {
            true
        }
    }

    fn queue(paths: &[&str]) -> Queue {
        let mut document = site_document("tv");
        document.patterns = Some(vec!["^Show".to_string()]);
        document.local_dir = Some("/storage/my tv/".to_string());
        let site = compile_site(document);
        let entries = paths
            .iter()
            .map(|path| DirectoryEntry::new(*path, Utc::now(), EntryKind::Directory))
            .collect();
        Queue::build(&site, entries, &Nothing, Utc::now())
    }

    /// Characters lftp treats as command syntax outside quotes.
    const SEPARATORS: &str = ";&|>";

    fn split_words(line: &str) -> Vec<String> {
        let mut words = Vec::new();
        let mut chars = line.chars().peekable();
        while let Some(&c) = chars.peek() {
            if c.is_whitespace() {
                chars.next();
                continue;
            }
            let mut word = String::new();
            if c == '"' {
                chars.next();
                while let Some(c) = chars.next() {
                    match c {
                        '"' => break,
                        '\\' => word.extend(chars.next()),
                        _ => word.push(c),
                    }
                }
            } else if SEPARATORS.contains(c) {
                word.push(c);
                chars.next();
            } else {
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || SEPARATORS.contains(c) {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
            }
            words.push(word);
        }
        words
    }

    #[test]
    fn script_lists_transferable_items_only() {
        let queue = queue(&["/tv/Show.S01E01", "/tv/Other.S01E01"]);
        assert_eq!(
            script(&queue),
            "open tv\nqueue mirror /tv/Show.S01E01 \"/storage/my tv/\"\nqueue start\nwait\nexit\n"
        );
    }

    #[test]
    fn queue_lines_round_trip() {
        let queue = queue(&[
            "/tv/Show \"quoted\" name",
            "/tv/Show\\back",
            "/tv/Show.S01E02",
            "/tv/Show.S01E03;!touch${IFS}pwned",
            "/tv/Show.S01E04&&ls|wc>out",
        ]);
        let parsed: Vec<(String, String)> = script(&queue)
            .lines()
            .filter(|line| line.starts_with("queue mirror "))
            .map(|line| {
                let words = split_words(line);
                assert_eq!(words.len(), 4, "{line}");
                (words[2].clone(), words[3].clone())
            })
            .collect();
        let expected: Vec<(String, String)> = queue
            .transferable()
            .map(|item| {
                (
                    item.path().to_string(),
                    item.local_dir().unwrap_or_default().to_string(),
                )
            })
            .collect();
        assert_eq!(parsed.len(), 5);
        assert_eq!(parsed, expected);
    }

    #[test]
    fn command_syntax_is_quoted() {
        assert_eq!(quote("/tv/Show.S01E01-GRP"), "/tv/Show.S01E01-GRP");
        assert_eq!(quote("a;!rm"), "\"a;!rm\"");
        assert_eq!(quote("!cmd"), "\"!cmd\"");
        assert_eq!(quote("$HOME"), "\"$HOME\"");
        assert_eq!(quote(""), "\"\"");

        let queue = queue(&["/tv/Show.S01E01;!touch${IFS}x"]);
        assert!(
            script(&queue).contains("queue mirror \"/tv/Show.S01E01;!touch${IFS}x\" "),
            "{}",
            script(&queue)
        );
    }

    #[test]
    fn empty_queue_still_renders_directives() {
        let queue = queue(&[]);
        assert_eq!(script(&queue), "open tv\nqueue start\nwait\nexit\n");
    }

    #[test]
    fn report_includes_rejected_items() -> anyhow::Result<()> {
        let queue = queue(&["/tv/Show.S01E01", "/tv/Other.S01E01"]);
        let value: serde_json::Value = serde_json::from_str(&report(&queue)?)?;
        let items = value.as_array().expect("report is an array");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["path"], "/tv/Other.S01E01");
        assert_eq!(items[0]["transfer"], false);
        assert_eq!(items[0]["reason"], "no match");
        assert_eq!(items[0]["local_dir"], "/storage/my tv/");
        assert_eq!(items[1]["local_dir"], "/storage/my tv/");
        assert_eq!(items[1]["transfer"], true);

        let compact = report_bytes(&queue)?;
        assert!(!compact.contains(&b'\n'));
        Ok(())
    }
}
