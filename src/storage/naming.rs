//! Storage naming.
//!
//! # Responsibilities
//! - Derive a storage-container name from a target authority
//! - Derive a storage-object path from a target path and capture instant
//!
//! # Design Decisions
//! - Container normalization is deterministic and idempotent
//! - The object-path timestamp uses a 24-hour clock with four sub-second
//!   digits, so two requests twelve hours apart can never share a path

use time::OffsetDateTime;

/// Maximum length of a container name.
const MAX_CONTAINER_LEN: usize = 63;

/// Maximum length of the target-path portion of an object path.
const MAX_PATH_LEN: usize = 1000;

/// Normalize a target authority (`host[:port]`) into a container name.
///
/// Spaces become hyphens; anything that is not a letter, digit, or hyphen
/// is dropped; hyphen runs collapse to one; a leading hyphen is dropped;
/// the result is truncated to 63 characters. Idempotent: normalizing an
/// already-normalized name returns it unchanged.
pub fn container_name(authority: &str) -> String {
    let mut name: String = authority
        .chars()
        .map(|c| if c == ' ' { '-' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect();

    loop {
        let collapsed = name.replace("--", "-");
        if collapsed.len() == name.len() {
            break;
        }
        name = collapsed;
    }

    let name = name.strip_prefix('-').unwrap_or(&name);
    name.chars().take(MAX_CONTAINER_LEN).collect()
}

/// Compose the object path for one transaction: the target path (truncated
/// to 1000 characters), a `/`, the capture instant, and `.zip`.
pub fn object_path(target_path: &str, captured_at: OffsetDateTime) -> String {
    let path: String = target_path.chars().take(MAX_PATH_LEN).collect();
    format!("{}/{}.zip", path, timestamp(captured_at))
}

/// `yyyymmddHHMMSSffff`: 24-hour clock, four sub-second digits (100µs).
fn timestamp(t: OffsetDateTime) -> String {
    format!(
        "{:04}{:02}{:02}{:02}{:02}{:02}{:04}",
        t.year(),
        t.month() as u8,
        t.day(),
        t.hour(),
        t.minute(),
        t.second(),
        t.microsecond() / 100,
    )
}
