// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Newline handling inside JSON string literals.
//!
//! Hand-edited canvas files often carry raw line breaks inside `text` values,
//! which strict JSON rejects. [`escape_raw_newlines`] repairs that before
//! parsing; [`unescape_newlines`] produces the same style on save when asked.
//! Both only touch characters inside string literals, so structural
//! whitespace is left exactly as it was.

use std::borrow::Cow;

/// Replace raw `\n` / `\r` inside string literals with their JSON escapes.
///
/// Returns the input unchanged (borrowed) when nothing needs escaping.
pub fn escape_raw_newlines(text: &str) -> Cow<'_, str> {
    if !needs_escaping(text) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    let mut in_string = false;
    let mut escaped = false;
    for c in text.chars() {
        if in_string {
            match c {
                '\n' | '\r' => {
                    out.push_str(if c == '\n' { "\\n" } else { "\\r" });
                    escaped = false;
                }
                _ => {
                    out.push(c);
                    if escaped {
                        escaped = false;
                    } else if c == '\\' {
                        escaped = true;
                    } else if c == '"' {
                        in_string = false;
                    }
                }
            }
            continue;
        }
        out.push(c);
        if c == '"' {
            in_string = true;
        }
    }
    Cow::Owned(out)
}

/// Turn `\n` / `\r` escapes inside string literals back into raw characters.
///
/// An escaped backslash followed by `n` (`\\n`) is left alone.
pub fn unescape_newlines(text: &str) -> Cow<'_, str> {
    if !text.contains("\\n") && !text.contains("\\r") {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if !in_string {
            out.push(c);
            in_string = c == '"';
            continue;
        }
        match c {
            '"' => {
                out.push(c);
                in_string = false;
            }
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            },
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn needs_escaping(text: &str) -> bool {
    let mut in_string = false;
    let mut escaped = false;
    for c in text.chars() {
        if !in_string {
            in_string = c == '"';
        } else if escaped {
            escaped = false;
        } else {
            match c {
                '\n' | '\r' => return true,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_whitespace_is_untouched() {
        let text = "{\n  \"text\": \"a\"\n}\n";
        assert!(matches!(escape_raw_newlines(text), Cow::Borrowed(_)));
    }

    #[test]
    fn raw_newlines_in_strings_are_escaped() {
        let text = "{\n  \"text\": \"line one\nline two\r\n\"\n}";
        assert_eq!(
            escape_raw_newlines(text),
            "{\n  \"text\": \"line one\\nline two\\r\\n\"\n}"
        );
    }

    #[test]
    fn escaped_quotes_do_not_end_the_string() {
        let text = "[\"say \\\"hi\n\\\" now\", \"b\"]";
        assert_eq!(escape_raw_newlines(text), "[\"say \\\"hi\\n\\\" now\", \"b\"]");
    }

    #[test]
    fn unescape_restores_raw_newlines() {
        let text = "{\"text\": \"a\\nb\"}";
        assert_eq!(unescape_newlines(text), "{\"text\": \"a\nb\"}");
    }

    #[test]
    fn escaped_backslash_before_n_is_kept() {
        let text = r#"{"file": "C:\\notes\\new.md"}"#;
        assert_eq!(unescape_newlines(text), text);
    }

    #[test]
    fn escape_and_unescape_are_inverse_on_raw_documents() {
        let raw = "{\"text\": \"# Title\n\n- item \\\"quoted\\\"\n\", \"n\": 1}";
        let escaped = escape_raw_newlines(raw);
        assert!(serde_json::from_str::<serde_json::Value>(&escaped).is_ok());
        assert_eq!(unescape_newlines(&escaped), raw);
    }
}
