//! Compilation of site documents into read-only [`Site`] values.

use std::time::Duration;

use regex::Regex;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{
    ClientSettings, LocalDir, MediaKind, Replacement, ReplacementDocument, Site, SiteDocument,
};
use crate::template::PathTemplate;

/// Compile a site document whose defaults have already been applied.
///
/// `position` names the site in errors when its `name` is missing.
///
/// # Errors
///
/// Returns the first [`ConfigError`] found in the document.
pub fn compile_site(
    document: &SiteDocument,
    client: &ClientSettings,
    position: usize,
) -> ConfigResult<Site> {
    let name = match document.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            return Err(ConfigError::MissingField {
                site: format!("#{position}"),
                field: "name",
            });
        }
    };

    let dirs = document.dirs.clone().unwrap_or_default();
    if dirs.is_empty() {
        return Err(ConfigError::MissingField {
            site: name,
            field: "dirs",
        });
    }

    let parser = parse_parser(&name, document.parser.as_deref())?;
    let local_dir = match document.local_dir.as_deref() {
        Some(local_dir) if !local_dir.trim().is_empty() => {
            parse_local_dir(&name, parser, local_dir)?
        }
        _ => {
            return Err(ConfigError::MissingField {
                site: name,
                field: "local_dir",
            });
        }
    };

    Ok(Site {
        max_age: parse_max_age(&name, document.max_age.as_deref())?,
        filters: compile_patterns(&name, "filters", document.filters.as_deref())?,
        patterns: compile_patterns(&name, "patterns", document.patterns.as_deref())?,
        priorities: compile_patterns(&name, "priorities", document.priorities.as_deref())?,
        replacements: compile_replacements(&name, document.replacements.as_deref())?,
        post_command: parse_command(document.post_command.as_deref()),
        get_cmd: client.get_cmd.clone(),
        skip_symlinks: document.skip_symlinks.unwrap_or(false),
        skip_files: document.skip_files.unwrap_or(false),
        skip_existing: document.skip_existing.unwrap_or(false),
        merge: document.merge.unwrap_or(false),
        deduplicate: document.deduplicate.unwrap_or(false),
        skip: document.skip.unwrap_or(false),
        name,
        dirs,
        parser,
        local_dir,
    })
}

fn compile_patterns(
    site: &str,
    field: &'static str,
    patterns: Option<&[String]>,
) -> ConfigResult<Vec<Regex>> {
    patterns
        .unwrap_or_default()
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                site: site.to_string(),
                field,
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

fn compile_replacements(
    site: &str,
    replacements: Option<&[ReplacementDocument]>,
) -> ConfigResult<Vec<Replacement>> {
    replacements
        .unwrap_or_default()
        .iter()
        .map(|document| {
            let pattern =
                Regex::new(&document.pattern).map_err(|source| ConfigError::InvalidPattern {
                    site: site.to_string(),
                    field: "replacements",
                    pattern: document.pattern.clone(),
                    source,
                })?;
            Ok(Replacement {
                pattern,
                replacement: document.replacement.clone(),
            })
        })
        .collect()
}

fn parse_max_age(site: &str, value: Option<&str>) -> ConfigResult<Option<Duration>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => humantime::parse_duration(value)
            .map(Some)
            .map_err(|source| ConfigError::InvalidDuration {
                site: site.to_string(),
                field: "max_age",
                value: value.to_string(),
                source,
            }),
    }
}

fn parse_parser(site: &str, value: Option<&str>) -> ConfigResult<MediaKind> {
    value
        .unwrap_or_default()
        .parse::<MediaKind>()
        .map_err(|value| ConfigError::InvalidParser {
            site: site.to_string(),
            value,
        })
}

fn parse_local_dir(site: &str, parser: MediaKind, value: &str) -> ConfigResult<LocalDir> {
    if parser == MediaKind::None {
        return Ok(LocalDir::Fixed(value.to_string()));
    }
    PathTemplate::parse(value)
        .map(LocalDir::Template)
        .map_err(|source| ConfigError::InvalidTemplate {
            site: site.to_string(),
            template: value.to_string(),
            source,
        })
}

fn parse_command(value: Option<&str>) -> Option<Vec<String>> {
    let argv: Vec<String> = value?.split_whitespace().map(str::to_string).collect();
    if argv.is_empty() { None } else { Some(argv) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ClientSettings {
        ClientSettings {
            lftp_path: "lftp".to_string(),
            get_cmd: "mirror".to_string(),
        }
    }

    fn document() -> SiteDocument {
        SiteDocument {
            name: Some("tv".to_string()),
            dirs: Some(vec!["/tv".to_string()]),
            local_dir: Some("/storage/{show.Name}/S{show.Season:02}/".to_string()),
            parser: Some("show".to_string()),
            max_age: Some("24h".to_string()),
            patterns: Some(vec!["^Show".to_string()]),
            post_command: Some("notify --stdin".to_string()),
            ..SiteDocument::default()
        }
    }

    #[test]
    fn compiles_a_complete_site() {
        let site = compile_site(&document(), &client(), 0).expect("site compiles");
        assert_eq!(site.name, "tv");
        assert_eq!(site.parser, MediaKind::Show);
        assert_eq!(site.max_age, Some(Duration::from_secs(24 * 60 * 60)));
        assert_eq!(site.patterns.len(), 1);
        assert!(matches!(site.local_dir, LocalDir::Template(_)));
        assert_eq!(
            site.post_command,
            Some(vec!["notify".to_string(), "--stdin".to_string()])
        );
        assert_eq!(site.get_cmd, "mirror");
        assert!(!site.deduplicate);
    }

    #[test]
    fn local_dir_is_fixed_without_parser() {
        let doc = SiteDocument {
            parser: None,
            local_dir: Some("/storage/{not a template}".to_string()),
            ..document()
        };
        let site = compile_site(&doc, &client(), 0).expect("site compiles");
        assert_eq!(
            site.local_dir,
            LocalDir::Fixed("/storage/{not a template}".to_string())
        );
    }

    #[test]
    fn missing_name_reports_position() {
        let doc = SiteDocument {
            name: None,
            ..document()
        };
        let err = compile_site(&doc, &client(), 3).expect_err("name is required");
        assert_eq!(err.site(), Some("#3"));
        assert!(err.to_string().contains("'name'"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let bad_pattern = SiteDocument {
            filters: Some(vec!["(unclosed".to_string()]),
            ..document()
        };
        assert!(matches!(
            compile_site(&bad_pattern, &client(), 0),
            Err(ConfigError::InvalidPattern {
                field: "filters",
                ..
            })
        ));

        let bad_age = SiteDocument {
            max_age: Some("forever".to_string()),
            ..document()
        };
        assert!(matches!(
            compile_site(&bad_age, &client(), 0),
            Err(ConfigError::InvalidDuration { .. })
        ));

        let bad_parser = SiteDocument {
            parser: Some("music".to_string()),
            ..document()
        };
        assert!(matches!(
            compile_site(&bad_parser, &client(), 0),
            Err(ConfigError::InvalidParser { .. })
        ));

        let bad_template = SiteDocument {
            local_dir: Some("/storage/{show.Name".to_string()),
            ..document()
        };
        assert!(matches!(
            compile_site(&bad_template, &client(), 0),
            Err(ConfigError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn empty_max_age_disables_the_limit() {
        assert_eq!(parse_max_age("tv", Some("  ")).expect("parses"), None);
        assert_eq!(parse_max_age("tv", None).expect("parses"), None);
    }
}
