//! Body content classification.
//!
//! Decides whether a body is embedded in the transcript as text or stored
//! as a separate binary archive entry. A fixed allow-list over the media
//! type, not a charset sniff.

/// Returns true if a body with this content type should be captured as
/// inline text.
///
/// Only the media type (the value up to the first `;`) is examined, so
/// `application/json; charset=utf-8` classifies the same as
/// `application/json`. An absent content type is treated as binary.
pub fn is_textual(content_type: Option<&str>) -> bool {
    let Some(content_type) = content_type else {
        return false;
    };
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim();

    let lower = media_type.to_ascii_lowercase();
    lower.starts_with("text/") || lower == "application/xml" || lower == "application/json"
}
