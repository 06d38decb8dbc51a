//! TEXT value escaping.
//!
//! Four characters are escaped: backslash, semicolon, comma and newline.
//! Nothing else is touched.

/// Escape `text` for use as an iCalendar TEXT value.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }

    escaped
}

/// Inverse of `escape_text`.
///
/// A backslash followed by anything other than the four escape letters is
/// kept as-is, as is a trailing lone backslash.
pub fn unescape_text(text: &str) -> String {
    let mut unescaped = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }

        match chars.next() {
            Some('\\') => unescaped.push('\\'),
            Some(';') => unescaped.push(';'),
            Some(',') => unescaped.push(','),
            Some('n') => unescaped.push('\n'),
            Some(other) => {
                unescaped.push('\\');
                unescaped.push(other);
            }
            None => unescaped.push('\\'),
        }
    }

    unescaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_four_characters() {
        assert_eq!(escape_text("A; B, C\nD"), "A\\; B\\, C\\nD");
        assert_eq!(escape_text("C:\\temp"), "C:\\\\temp");
    }

    #[test]
    fn test_escape_leaves_everything_else() {
        assert_eq!(escape_text("Tab\there: \"quoted\" é"), "Tab\there: \"quoted\" é");
    }

    #[test]
    fn test_unescape_inverts_escape() {
        for original in ["A; B, C\nD", "back\\slash\\n literal", "", ";;,,\n\n\\\\", "plain"] {
            assert_eq!(unescape_text(&escape_text(original)), original);
        }
    }

    #[test]
    fn test_unescape_keeps_unknown_sequences() {
        assert_eq!(unescape_text("a\\tb"), "a\\tb");
        assert_eq!(unescape_text("trailing\\"), "trailing\\");
    }
}
