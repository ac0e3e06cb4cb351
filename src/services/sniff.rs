//! Content-based MIME detection

/// Best-effort MIME detection from an attachment's bytes.
///
/// Matches on magic numbers only; returns `None` for empty payloads and
/// for content with no known signature (plain text has none, so it stays
/// undetected rather than guessed).
#[must_use]
pub fn detect_mime(bytes: &[u8]) -> Option<String> {
    infer::get(bytes).map(|kind| kind.mime_type().to_string())
}
