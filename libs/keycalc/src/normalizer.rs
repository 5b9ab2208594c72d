//! Token normalizer
//!
//! Keypad glyphs are rewritten to canonical expression text before they reach
//! the buffer, so the evaluator only ever sees ASCII operators and names.
//!
//! | Glyph | Canonical |
//! |-------|-----------|
//! | `×` | `*` |
//! | `÷` | `/` |
//! | `^` | `**` |
//! | `π` | `pi` |
//! | `√` | `sqrt(` |
//!
//! Every other token is appended verbatim.

use crate::numfmt;

/// Glyph substitution table
pub const SYMBOLS: [(&str, &str); 5] = [
    ("×", "*"),
    ("÷", "/"),
    ("^", "**"),
    ("π", "pi"),
    ("√", "sqrt("),
];

/// Canonical text for a raw keypad token
pub fn normalize(raw: &str) -> &str {
    SYMBOLS
        .iter()
        .find(|(glyph, _)| *glyph == raw)
        .map_or(raw, |&(_, canonical)| canonical)
}

/// Append a keypad token to the buffer
pub fn append(buffer: &mut String, raw: &str) {
    buffer.push_str(normalize(raw));
}

/// Negate the buffer
///
/// A buffer holding a single real number is replaced by its negation in float
/// notation (`4` becomes `-4.0`). Anything else gets one leading `-` removed or
/// added.
pub fn toggle_sign(buffer: &mut String) {
    if buffer.is_empty() {
        return;
    }

    if let Some(value) = parse_real(buffer) {
        *buffer = numfmt::float_to_string(-value);
    } else if let Some(rest) = buffer.strip_prefix('-') {
        *buffer = rest.to_owned();
    } else {
        buffer.insert(0, '-');
    }
}

/// Wrap the buffer as a reciprocal: `x` becomes `1/(x)`
pub fn invert(buffer: &mut String) {
    if buffer.is_empty() {
        return;
    }
    *buffer = format!("1/({})", buffer);
}

/// Remove the last character
pub fn backspace(buffer: &mut String) {
    buffer.pop();
}

pub fn clear(buffer: &mut String) {
    buffer.clear();
}

/// Buffer text, or `0` when there is nothing to show
pub fn current_display(buffer: &str) -> &str {
    if buffer.is_empty() {
        "0"
    } else {
        buffer
    }
}

/// Parse the whole buffer as one real number
///
/// Accepts surrounding whitespace, a sign, exponent forms, `inf`/`nan`
/// spellings and `_` between digits.
fn parse_real(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.contains('_') {
        let bytes = trimmed.as_bytes();
        let separators_ok = bytes.iter().enumerate().all(|(i, &b)| {
            b != b'_'
                || (i > 0
                    && bytes[i - 1].is_ascii_digit()
                    && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
        });
        if !separators_ok {
            return None;
        }
        return trimmed.replace('_', "").parse().ok();
    }
    trimmed.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_table() {
        for (glyph, canonical) in SYMBOLS {
            let mut buffer = String::from("2");
            append(&mut buffer, glyph);
            assert_eq!(buffer, format!("2{}", canonical));
        }
    }

    #[test]
    fn test_other_tokens_verbatim() {
        let mut buffer = String::new();
        for token in ["1", "+", "sin", "(", "e", ")", "%", "."] {
            append(&mut buffer, token);
        }
        assert_eq!(buffer, "1+sin(e)%.");
    }

    #[test]
    fn test_toggle_sign_number() {
        let mut buffer = String::from("4");
        toggle_sign(&mut buffer);
        assert_eq!(buffer, "-4.0");
        toggle_sign(&mut buffer);
        assert_eq!(buffer, "4.0");

        let mut zero = String::from("0");
        toggle_sign(&mut zero);
        assert_eq!(zero, "-0.0");

        let mut sci = String::from(" 1e3 ");
        toggle_sign(&mut sci);
        assert_eq!(sci, "-1000.0");

        let mut grouped = String::from("1_000");
        toggle_sign(&mut grouped);
        assert_eq!(grouped, "-1000.0");

        let mut inf = String::from("inf");
        toggle_sign(&mut inf);
        assert_eq!(inf, "-inf");
    }

    #[test]
    fn test_toggle_sign_expression() {
        let mut buffer = String::from("2+3");
        toggle_sign(&mut buffer);
        assert_eq!(buffer, "-2+3");
        toggle_sign(&mut buffer);
        assert_eq!(buffer, "2+3");

        let mut bad_separator = String::from("1__0");
        toggle_sign(&mut bad_separator);
        assert_eq!(bad_separator, "-1__0");
    }

    #[test]
    fn test_toggle_sign_empty_is_noop() {
        let mut buffer = String::new();
        toggle_sign(&mut buffer);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_invert() {
        let mut buffer = String::from("2+2");
        invert(&mut buffer);
        assert_eq!(buffer, "1/(2+2)");

        let mut empty = String::new();
        invert(&mut empty);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_backspace_removes_whole_char() {
        let mut buffer = String::from("2π");
        backspace(&mut buffer);
        assert_eq!(buffer, "2");
        backspace(&mut buffer);
        backspace(&mut buffer);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_current_display() {
        assert_eq!(current_display(""), "0");
        assert_eq!(current_display("1+"), "1+");
    }
}
