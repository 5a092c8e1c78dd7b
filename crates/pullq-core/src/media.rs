//! Media descriptors parsed from release directory names.
//!
//! # Design
//! - Parsing is pure: the same name, kind and replacements always give the
//!   same descriptor or the same error.
//! - Equality is by identifying fields only (show: name, season, episode;
//!   movie: title, year). An unparsed descriptor never equals anything.

use once_cell::sync::Lazy;
use pullq_config::{FieldName, FieldScope, MediaKind, Replacement};
use regex::{Captures, Regex};
use serde::Serialize;

use crate::error::{ParseError, ParseResult};

static SHOW_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^(?P<name>.+?)[._ -]+S(?P<season>\d{1,2})E(?P<episode>\d{1,3})",
        r"(?i)^(?P<name>.+?)[._ -]+(?P<season>\d{1,2})x(?P<episode>\d{1,3})(?:[._ -]|$)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("show pattern is valid"))
    .collect()
});

static MOVIE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<title>.+)[._ -]+\(?(?P<year>(?:19|20)\d{2})\)?(?:[._ -]|$)")
        .expect("movie pattern is valid")
});

/// An episode of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Show {
    /// Full release name the show was parsed from.
    pub release: String,
    /// Series name, separators preserved.
    pub name: String,
    /// Season number.
    pub season: u32,
    /// Episode number.
    pub episode: u32,
}

impl Show {
    /// Whether both describe the same episode.
    #[must_use]
    pub fn same_episode(&self, other: &Self) -> bool {
        self.name == other.name && self.season == other.season && self.episode == other.episode
    }
}

/// A movie release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Movie {
    /// Full release name the movie was parsed from.
    pub release: String,
    /// Movie title, separators preserved.
    pub title: String,
    /// Release year.
    pub year: u16,
}

impl Movie {
    /// Whether both describe the same movie.
    #[must_use]
    pub fn same_movie(&self, other: &Self) -> bool {
        self.title == other.title && self.year == other.year
    }
}

/// Structured identity of a directory.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MediaDescriptor {
    /// Parsed as a show episode.
    Show(Show),
    /// Parsed as a movie.
    Movie(Movie),
    /// No parsing requested.
    None,
}

impl MediaDescriptor {
    /// Parse `name` as the requested kind, applying `replacements` to the
    /// show name or movie title.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::NoEpisodeMarker`] or [`ParseError::NoYearMarker`]
    /// when the name carries no recognisable marker.
    pub fn parse(name: &str, kind: MediaKind, replacements: &[Replacement]) -> ParseResult<Self> {
        match kind {
            MediaKind::None => Ok(Self::None),
            MediaKind::Show => parse_show(name, replacements).map(Self::Show),
            MediaKind::Movie => parse_movie(name, replacements).map(Self::Movie),
        }
    }

    /// Whether both descriptors identify the same media.
    #[must_use]
    pub fn same_media(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Show(a), Self::Show(b)) => a.same_episode(b),
            (Self::Movie(a), Self::Movie(b)) => a.same_movie(b),
            _ => false,
        }
    }

    /// Short label of the variant.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Show(_) => "show",
            Self::Movie(_) => "movie",
            Self::None => "unparsed entry",
        }
    }

    /// Value of a template field, if this descriptor has it.
    #[must_use]
    pub fn field(&self, scope: Option<FieldScope>, field: FieldName) -> Option<String> {
        match (self, scope) {
            (Self::Show(show), None | Some(FieldScope::Show)) => match field {
                FieldName::Name => Some(show.name.clone()),
                FieldName::Season => Some(show.season.to_string()),
                FieldName::Episode => Some(show.episode.to_string()),
                FieldName::Release => Some(show.release.clone()),
                FieldName::Title | FieldName::Year => None,
            },
            (Self::Movie(movie), None | Some(FieldScope::Movie)) => match field {
                FieldName::Title => Some(movie.title.clone()),
                FieldName::Year => Some(movie.year.to_string()),
                FieldName::Release => Some(movie.release.clone()),
                FieldName::Name | FieldName::Season | FieldName::Episode => None,
            },
            _ => None,
        }
    }
}

fn parse_show(name: &str, replacements: &[Replacement]) -> ParseResult<Show> {
    let captures = SHOW_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(name))
        .ok_or_else(|| ParseError::NoEpisodeMarker {
            name: name.to_string(),
        })?;
    let no_marker = || ParseError::NoEpisodeMarker {
        name: name.to_string(),
    };

    Ok(Show {
        release: name.to_string(),
        name: rewrite(&captures["name"], replacements),
        season: number(&captures, "season").ok_or_else(no_marker)?,
        episode: number(&captures, "episode").ok_or_else(no_marker)?,
    })
}

fn parse_movie(name: &str, replacements: &[Replacement]) -> ParseResult<Movie> {
    let no_marker = || ParseError::NoYearMarker {
        name: name.to_string(),
    };
    let captures = MOVIE_PATTERN.captures(name).ok_or_else(no_marker)?;

    Ok(Movie {
        release: name.to_string(),
        title: rewrite(
            captures["title"].trim_end_matches(['.', '_', ' ', '-']),
            replacements,
        ),
        year: number(&captures, "year").ok_or_else(no_marker)?,
    })
}

fn number<T: std::str::FromStr>(captures: &Captures<'_>, group: &str) -> Option<T> {
    captures.name(group)?.as_str().parse().ok()
}

fn rewrite(value: &str, replacements: &[Replacement]) -> String {
    replacements
        .iter()
        .fold(value.to_string(), |acc, replacement| replacement.apply(&acc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show(name: &str) -> Show {
        match MediaDescriptor::parse(name, MediaKind::Show, &[]).expect("show parses") {
            MediaDescriptor::Show(show) => show,
            other => panic!("expected show, got {other:?}"),
        }
    }

    fn movie(name: &str) -> Movie {
        match MediaDescriptor::parse(name, MediaKind::Movie, &[]).expect("movie parses") {
            MediaDescriptor::Movie(movie) => movie,
            other => panic!("expected movie, got {other:?}"),
        }
    }

    #[test]
    fn parses_season_episode_markers() {
        let parsed = show("The.Wire.S03E07.720p.HDTV.x264-GRP");
        assert_eq!(parsed.name, "The.Wire");
        assert_eq!(parsed.season, 3);
        assert_eq!(parsed.episode, 7);
        assert_eq!(parsed.release, "The.Wire.S03E07.720p.HDTV.x264-GRP");

        let lower = show("the_office_s09e123_web");
        assert_eq!(lower.name, "the_office");
        assert_eq!(lower.episode, 123);
    }

    #[test]
    fn parses_alternate_episode_marker() {
        let parsed = show("Top.Gear.22x04.HDTV");
        assert_eq!(parsed.name, "Top.Gear");
        assert_eq!(parsed.season, 22);
        assert_eq!(parsed.episode, 4);
    }

    #[test]
    fn show_without_marker_fails() {
        let err = MediaDescriptor::parse("Show.Complete.Series", MediaKind::Show, &[])
            .expect_err("no marker");
        assert_eq!(
            err,
            ParseError::NoEpisodeMarker {
                name: "Show.Complete.Series".to_string()
            }
        );
    }

    #[test]
    fn parses_movie_years() {
        let parsed = movie("The.Matrix.1999.1080p.BluRay");
        assert_eq!(parsed.title, "The.Matrix");
        assert_eq!(parsed.year, 1999);

        let odyssey = movie("2001.A.Space.Odyssey.1968.720p");
        assert_eq!(odyssey.title, "2001.A.Space.Odyssey");
        assert_eq!(odyssey.year, 1968);

        let sequel = movie("Blade.Runner.2049.2017.1080p");
        assert_eq!(sequel.title, "Blade.Runner.2049");
        assert_eq!(sequel.year, 2017);

        let doubled = movie("Heat..1995");
        assert_eq!(doubled.title, "Heat");

        let bracketed = movie("Heat (1995)");
        assert_eq!(bracketed.title, "Heat");
        assert_eq!(bracketed.year, 1995);
    }

    #[test]
    fn movie_without_year_fails() {
        assert!(matches!(
            MediaDescriptor::parse("Some.Movie.1080p", MediaKind::Movie, &[]),
            Err(ParseError::NoYearMarker { .. })
        ));
    }

    #[test]
    fn none_kind_always_succeeds() {
        let parsed = MediaDescriptor::parse("anything at all", MediaKind::None, &[])
            .expect("none never fails");
        assert!(matches!(parsed, MediaDescriptor::None));
    }

    #[test]
    fn replacements_apply_to_names() {
        let replacements = [Replacement {
            pattern: Regex::new("(?i)^the.wire$").expect("regex"),
            replacement: "The.Wire".to_string(),
        }];
        let parsed = MediaDescriptor::parse("THE.WIRE.S01E01.DVDRip", MediaKind::Show, &replacements)
            .expect("show parses");
        let MediaDescriptor::Show(parsed) = parsed else {
            panic!("expected show");
        };
        assert_eq!(parsed.name, "The.Wire");
    }

    #[test]
    fn equality_uses_identifying_fields_only() {
        let a = MediaDescriptor::Show(show("Show.S01E01.720p"));
        let b = MediaDescriptor::Show(show("Show.S01E01.1080p"));
        let c = MediaDescriptor::Show(show("Show.S01E02.1080p"));
        assert!(a.same_media(&b));
        assert!(!a.same_media(&c));

        let m1 = MediaDescriptor::Movie(movie("Heat.1995.720p"));
        let m2 = MediaDescriptor::Movie(movie("Heat.1995.1080p"));
        assert!(m1.same_media(&m2));
        assert!(!m1.same_media(&a));

        assert!(!MediaDescriptor::None.same_media(&MediaDescriptor::None));
    }

    #[test]
    fn fields_respect_scope() {
        let descriptor = MediaDescriptor::Show(show("Show.S02E05"));
        assert_eq!(
            descriptor.field(Some(FieldScope::Show), FieldName::Season),
            Some("2".to_string())
        );
        assert_eq!(
            descriptor.field(None, FieldName::Name),
            Some("Show".to_string())
        );
        assert_eq!(descriptor.field(Some(FieldScope::Movie), FieldName::Release), None);
        assert_eq!(descriptor.field(None, FieldName::Year), None);
        assert_eq!(MediaDescriptor::None.field(None, FieldName::Release), None);
    }
}
