//! Local destination resolution.

use pullq_config::{LocalDir, PathTemplate, Segment, Site};
use tracing::debug;

use crate::error::TemplateError;
use crate::item::Item;
use crate::media::MediaDescriptor;

/// Render `template` with the fields of `media`.
///
/// # Errors
///
/// Returns [`TemplateError::FieldUnavailable`] when a placeholder names a
/// field the descriptor does not carry.
pub fn render(template: &PathTemplate, media: &MediaDescriptor) -> Result<String, TemplateError> {
    let mut rendered = String::with_capacity(template.as_str().len());
    for segment in template.segments() {
        match segment {
            Segment::Literal(text) => rendered.push_str(text),
            Segment::Field(placeholder) => {
                let value = media.field(placeholder.scope, placeholder.field).ok_or_else(|| {
                    TemplateError::FieldUnavailable {
                        placeholder: placeholder.to_string(),
                        descriptor: media.label(),
                    }
                })?;
                match placeholder.width {
                    Some(width) => rendered.push_str(&format!("{value:0>width$}")),
                    None => rendered.push_str(&value),
                }
            }
        }
    }
    Ok(rendered)
}

/// Parse the item's media descriptor and compute its local directory.
///
/// Failures reject the item with the error text as its reason.
pub fn resolve(site: &Site, item: &mut Item) {
    let media = match MediaDescriptor::parse(item.entry.base(), site.parser, &site.replacements) {
        Ok(media) => media,
        Err(err) => {
            debug!(path = item.path(), error = %err, "media parse failed");
            item.reject(err.to_string());
            return;
        }
    };

    let local_dir = match &site.local_dir {
        LocalDir::Fixed(path) => Ok(path.clone()),
        LocalDir::Template(template) => render(template, &media),
    };
    item.media = media;
    match local_dir {
        Ok(local_dir) => item.local_dir = Some(local_dir),
        Err(err) => {
            debug!(path = item.path(), error = %err, "local directory render failed");
            item.reject(err.to_string());
        }
    }
}
