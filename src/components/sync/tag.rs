//! Encoding of the marker that links a calendar entry to a GroupMe event.
//!
//! The marker lives in the entry description as `[GroupMe Event ID: <id>]`.
//! Inside the id, `\` is written as `\\` and `]` as `\]`, so ids made of
//! ordinary characters produce exactly the legacy unescaped marker.

use lazy_static::lazy_static;
use regex::Regex;

/// Text every marker starts with
pub const TAG_MARKER: &str = "[GroupMe Event ID:";

lazy_static! {
    static ref TAG_PATTERN: Regex = Regex::new(r"\[GroupMe Event ID: ((?:[^\]\\]|\\.)+)\]")
        .expect("TAG_PATTERN should compile - this is a bug");
}

/// Marker for a remote event id
pub fn encode(remote_id: &str) -> String {
    let mut escaped = String::with_capacity(remote_id.len());
    for c in remote_id.chars() {
        if c == '\\' || c == ']' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("{} {}]", TAG_MARKER, escaped)
}

/// Remote id of the first marker in `text`
pub fn decode(text: &str) -> Option<String> {
    let captures = TAG_PATTERN.captures(text)?;
    let raw = captures.get(1)?.as_str();

    let mut id = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                id.push(next);
            }
        } else {
            id.push(c);
        }
    }
    Some(id)
}

/// First marker in `text`, exactly as written
pub fn find(text: &str) -> Option<&str> {
    TAG_PATTERN.find(text).map(|m| m.as_str())
}

/// `text` without the marker and anything after it, trimmed
pub fn strip(text: &str) -> &str {
    match text.find(TAG_MARKER) {
        Some(index) => text[..index].trim(),
        None => text.trim(),
    }
}
