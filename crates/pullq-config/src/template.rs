//! Local directory templates.
//!
//! A template is plain text with `{...}` placeholders naming a media field,
//! optionally scoped (`{show.Season}`) and optionally zero-padded
//! (`{show.Season:02}`). Syntax is checked when the configuration is compiled;
//! whether a field exists on a particular descriptor is only known at render
//! time and is checked by the queue builder.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

/// Syntax error found while parsing a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason} at offset {offset}")]
pub struct TemplateSyntaxError {
    /// Byte offset of the offending placeholder.
    pub offset: usize,
    /// Static description of the problem.
    pub reason: &'static str,
}

/// Media variant a placeholder is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldScope {
    /// Fields of a parsed show.
    Show,
    /// Fields of a parsed movie.
    Movie,
}

impl FieldScope {
    /// Lowercase scope prefix used in templates.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::Movie => "movie",
        }
    }

    const fn allows(self, field: FieldName) -> bool {
        match self {
            Self::Show => matches!(
                field,
                FieldName::Name | FieldName::Season | FieldName::Episode | FieldName::Release
            ),
            Self::Movie => matches!(
                field,
                FieldName::Title | FieldName::Year | FieldName::Release
            ),
        }
    }
}

/// Field a placeholder renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldName {
    /// Show name.
    Name,
    /// Show season number.
    Season,
    /// Show episode number.
    Episode,
    /// Movie title.
    Title,
    /// Movie release year.
    Year,
    /// Full release (directory) name.
    Release,
}

impl FieldName {
    /// Field name as written in templates.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Season => "Season",
            Self::Episode => "Episode",
            Self::Title => "Title",
            Self::Year => "Year",
            Self::Release => "Release",
        }
    }
}

impl FromStr for FieldName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Name" => Ok(Self::Name),
            "Season" => Ok(Self::Season),
            "Episode" => Ok(Self::Episode),
            "Title" => Ok(Self::Title),
            "Year" => Ok(Self::Year),
            "Release" => Ok(Self::Release),
            _ => Err(()),
        }
    }
}

/// A single `{...}` placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    /// Required media variant, if the placeholder is scoped.
    pub scope: Option<FieldScope>,
    /// Field to render.
    pub field: FieldName,
    /// Minimum width; shorter values are left-padded with zeros.
    pub width: Option<usize>,
}

impl Display for Placeholder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        if let Some(scope) = self.scope {
            write!(f, "{}.", scope.as_str())?;
        }
        f.write_str(self.field.as_str())?;
        if let Some(width) = self.width {
            write!(f, ":{width:02}")?;
        }
        f.write_str("}")
    }
}

/// Piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied verbatim.
    Literal(String),
    /// Field substituted at render time.
    Field(Placeholder),
}

/// Parsed local directory template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parse a template string.
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateSyntaxError`] for unbalanced braces, empty or
    /// unknown placeholders, and invalid widths.
    pub fn parse(source: &str) -> Result<Self, TemplateSyntaxError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(pos) = rest.find(['{', '}']) {
            let at = offset + pos;
            if rest[pos..].starts_with('}') {
                return Err(TemplateSyntaxError {
                    offset: at,
                    reason: "unmatched closing brace",
                });
            }
            literal.push_str(&rest[..pos]);
            let body_start = pos + 1;
            let Some(len) = rest[body_start..].find('}') else {
                return Err(TemplateSyntaxError {
                    offset: at,
                    reason: "unclosed placeholder",
                });
            };
            let body = &rest[body_start..body_start + len];
            if body.contains('{') {
                return Err(TemplateSyntaxError {
                    offset: at,
                    reason: "nested placeholder",
                });
            }
            let placeholder = parse_placeholder(body).map_err(|reason| TemplateSyntaxError {
                offset: at,
                reason,
            })?;
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Field(placeholder));

            let consumed = body_start + len + 1;
            offset += consumed;
            rest = &rest[consumed..];
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// Template text as configured.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Parsed segments in order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the template contains at least one placeholder.
    #[must_use]
    pub fn has_placeholders(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Field(_)))
    }
}

/// Widest zero padding a placeholder may request.
pub const MAX_PLACEHOLDER_WIDTH: usize = 16;

fn parse_placeholder(body: &str) -> Result<Placeholder, &'static str> {
    let body = body.trim();
    if body.is_empty() {
        return Err("empty placeholder");
    }
    let (key, width) = match body.split_once(':') {
        Some((key, width)) => {
            let width = width
                .parse::<usize>()
                .map_err(|_| "invalid placeholder width")?;
            if width > MAX_PLACEHOLDER_WIDTH {
                return Err("placeholder width too large");
            }
            (key, Some(width))
        }
        None => (body, None),
    };
    let (scope, field) = match key.split_once('.') {
        Some(("show", field)) => (Some(FieldScope::Show), field),
        Some(("movie", field)) => (Some(FieldScope::Movie), field),
        Some(_) => return Err("unknown placeholder scope"),
        None => (None, key),
    };
    let field = field
        .parse::<FieldName>()
        .map_err(|()| "unknown placeholder field")?;
    if scope.is_some_and(|scope| !scope.allows(field)) {
        return Err("field not available for scope");
    }
    Ok(Placeholder {
        scope,
        field,
        width,
    })
}
