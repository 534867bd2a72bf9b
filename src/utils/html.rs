//! HTML utility functions.
//!
//! - `escape_text()` - minimal escaping for code and text content (`&`, `<`, `>`)
//! - `escape_attr()` - attribute escaping (adds quotes)

use std::borrow::Cow;

/// Characters escaped in text content.
const TEXT_CHARS: [char; 3] = ['<', '>', '&'];

/// Characters escaped in attribute values.
const ATTR_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape `&`, `<` and `>` only.
///
/// Fenced code is escaped with exactly this set so backtick runs and quotes
/// survive untouched.
///
/// # Example
/// ```
/// # use folio::utils::html::escape_text;
/// assert_eq!(escape_text("a < b && c"), "a &lt; b &amp;&amp; c");
/// assert_eq!(escape_text("\"q\""), "\"q\"");
/// ```
#[inline]
pub fn escape_text(s: &str) -> Cow<'_, str> {
    escape_with(s, &TEXT_CHARS)
}

/// Escape a value placed inside a double-quoted attribute.
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape_with(s, &ATTR_CHARS)
}

fn escape_with<'a>(s: &'a str, chars: &[char]) -> Cow<'a, str> {
    if !s.contains(chars) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match escape_char(c).filter(|_| chars.contains(&c)) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text_leaves_quotes() {
        assert_eq!(escape_text("<b>\"x\"</b>"), "&lt;b&gt;\"x\"&lt;/b&gt;");
        assert!(matches!(escape_text("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("a\"b'c&"), "a&quot;b&#39;c&amp;");
    }

    #[test]
    fn test_escape_backtick_runs_untouched() {
        assert_eq!(escape_text("``` <x>"), "``` &lt;x&gt;");
    }
}
