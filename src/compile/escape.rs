//! HTML entity escaping for generated markup.
//!
//! Covers the five characters that matter in text and attribute positions.
//! Returns borrowed input unchanged when nothing needs escaping, so the
//! common case allocates nothing.

use std::borrow::Cow;

/// Replacement for a character that must be escaped, if any.
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape a string for an HTML text position.
///
/// # Examples
/// ```ignore
/// assert_eq!(escape("<script>"), "&lt;script&gt;");
/// assert_eq!(escape("hello"), "hello"); // No allocation
/// ```
pub fn escape(s: &str) -> Cow<'_, str> {
    let first = match s.char_indices().find(|(_, c)| escape_char(*c).is_some()) {
        Some((index, _)) => index,
        None => return Cow::Borrowed(s),
    };

    let mut out = String::with_capacity(s.len() + 8);
    out.push_str(&s[..first]);
    for c in s[first..].chars() {
        match escape_char(c) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escape a string for an HTML attribute value.
///
/// Identical to `escape()` but semantically indicates attribute context.
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape(s)
}
