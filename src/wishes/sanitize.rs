//! Text normalization for user-submitted fields.
//!
//! Trims, strips control characters, and collapses runs of whitespace.
//! The transform never lengthens its input, so the length check on the
//! raw message stays authoritative.

/// Normalize a free-text field (wish message, region).
pub fn normalize_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;
    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
        } else if !ch.is_control() {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(ch);
        }
    }
    out
}

/// Normalize a display field, substituting `fallback` when nothing is left.
pub fn normalize_display(input: &str, fallback: &str) -> String {
    let normalized = normalize_text(input);
    if normalized.is_empty() {
        fallback.to_string()
    } else {
        normalized
    }
}
