//! Keypad keys and display bookkeeping
//!
//! Maps typed keys onto `CalcSession` operations and tracks what the main
//! display and the sub-display show, the way the desktop keypad does:
//! - after an error is shown, typing starts from a clean buffer
//! - backspace on an error clears everything
//! - the sign key is ignored while an error is shown

use keycalc::{CalcSession, Evaluation};
use tracing::debug;

/// Glyph keys recognized inside a typed word
const GLYPHS: [char; 5] = ['×', '÷', '^', 'π', '√'];

/// A single keypad key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// Append a token (digit, operator, name or glyph)
    Token(String),
    /// `=`
    Equals,
    /// `C`
    Clear,
    /// `⌫` / `BS`
    Backspace,
    /// `±` / `NEG`
    ToggleSign,
    /// `1/x`
    Invert,
    /// `ln`, appends `log(`
    Ln,
}

impl Key {
    /// Parse a whole word that names a control key
    fn control(word: &str) -> Option<Key> {
        let key = match word {
            "=" => Key::Equals,
            "C" | "c" => Key::Clear,
            "⌫" | "BS" | "bs" => Key::Backspace,
            "±" | "NEG" | "neg" => Key::ToggleSign,
            "1/x" => Key::Invert,
            "ln" => Key::Ln,
            _ => return None,
        };
        Some(key)
    }
}

/// Split an input line into keys
///
/// Words are separated by whitespace. A word naming a control key is that
/// key. Any other word is scanned for glyphs and `=`, which become keys of
/// their own; the text in between is appended verbatim.
pub fn parse_keys(line: &str) -> Vec<Key> {
    let mut keys = Vec::new();
    for word in line.split_whitespace() {
        if let Some(key) = Key::control(word) {
            keys.push(key);
            continue;
        }

        let mut run = String::new();
        for ch in word.chars() {
            if ch == '=' || GLYPHS.contains(&ch) {
                if !run.is_empty() {
                    keys.push(Key::Token(std::mem::take(&mut run)));
                }
                keys.push(if ch == '=' {
                    Key::Equals
                } else {
                    Key::Token(ch.to_string())
                });
            } else {
                run.push(ch);
            }
        }
        if !run.is_empty() {
            keys.push(Key::Token(run));
        }
    }
    keys
}

/// Calculator session plus what its displays currently show
#[derive(Debug)]
pub struct Keypad {
    session: CalcSession,
    display: String,
    subdisplay: String,
}

impl Keypad {
    pub fn new() -> Self {
        Self {
            session: CalcSession::new(),
            display: "0".to_string(),
            subdisplay: String::new(),
        }
    }

    /// Main display: the buffer, a result or an error text
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Expression that produced the last result
    pub fn subdisplay(&self) -> &str {
        &self.subdisplay
    }

    pub fn session(&self) -> &CalcSession {
        &self.session
    }

    /// Apply one key; returns the outcome when the key was `=`
    pub fn press(&mut self, key: &Key) -> Option<Evaluation> {
        debug!(?key, "Key pressed");
        match key {
            Key::Token(token) => {
                if self.session.showing_error() {
                    self.session.clear();
                }
                self.session.append(token);
            },
            Key::Ln => self.session.append("log("),
            Key::Invert => self.session.invert(),
            Key::ToggleSign => {
                if self.session.showing_error() {
                    return None;
                }
                self.session.toggle_sign();
            },
            Key::Backspace => {
                if self.session.showing_error() {
                    self.clear();
                    return None;
                }
                self.session.backspace();
            },
            Key::Clear => {
                self.clear();
                return None;
            },
            Key::Equals => {
                self.subdisplay = self.session.current_display().to_string();
                let outcome = self.session.evaluate();
                self.display = outcome.to_string();
                return Some(outcome);
            },
        }
        self.display = self.session.current_display().to_string();
        None
    }

    /// Apply every key on a line, returning the evaluations it produced
    pub fn press_line(&mut self, line: &str) -> Vec<Evaluation> {
        parse_keys(line)
            .iter()
            .filter_map(|key| self.press(key))
            .collect()
    }

    fn clear(&mut self) {
        self.session.clear();
        self.subdisplay.clear();
        self.display = self.session.current_display().to_string();
    }
}

impl Default for Keypad {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    fn token(s: &str) -> Key {
        Key::Token(s.to_string())
    }

    #[test]
    fn test_parse_control_words() {
        assert_eq!(
            parse_keys("= C ⌫ BS ± NEG 1/x ln"),
            vec![
                Key::Equals,
                Key::Clear,
                Key::Backspace,
                Key::Backspace,
                Key::ToggleSign,
                Key::ToggleSign,
                Key::Invert,
                Key::Ln,
            ]
        );
    }

    #[test]
    fn test_parse_splits_glyphs_and_equals() {
        assert_eq!(
            parse_keys("2×3^2="),
            vec![token("2"), token("×"), token("3"), token("^"), token("2"), Key::Equals]
        );
        assert_eq!(
            parse_keys("sin( π ÷ 2 )"),
            vec![token("sin("), token("π"), token("÷"), token("2"), token(")")]
        );
        assert!(parse_keys("   ").is_empty());
    }

    #[test]
    fn test_evaluate_shows_result_and_expression() {
        let mut keypad = Keypad::new();
        let outcomes = keypad.press_line("12 ÷ 4 =");

        assert_eq!(outcomes.len(), 1);
        assert_eq!(keypad.display(), "3.0");
        assert_eq!(keypad.subdisplay(), "12/4");
        assert_eq!(keypad.session().recent_history(1), ["12/4 = 3.0"]);
    }

    #[test]
    fn test_error_display_is_kept_until_next_key() {
        let mut keypad = Keypad::new();
        keypad.press_line("5/0=");
        assert_eq!(keypad.display(), "Cannot divide by zero");

        keypad.press(&Key::ToggleSign);
        assert_eq!(keypad.display(), "Cannot divide by zero");

        keypad.press(&token("7"));
        assert_eq!(keypad.display(), "7");
        assert_eq!(keypad.session().buffer(), "7");
    }

    #[test]
    fn test_backspace_on_error_clears() {
        let mut keypad = Keypad::new();
        keypad.press_line("2+ =");
        assert_eq!(keypad.display(), "Invalid expression");
        assert_eq!(keypad.subdisplay(), "2+");

        keypad.press(&Key::Backspace);
        assert_eq!(keypad.display(), "0");
        assert_eq!(keypad.subdisplay(), "");
    }

    #[test]
    fn test_scientific_keys() {
        let mut keypad = Keypad::new();
        keypad.press_line("ln e ) =");
        assert_eq!(keypad.display(), "1.0");

        keypad.press_line("C 4 1/x =");
        assert_eq!(keypad.display(), "0.25");

        keypad.press_line("C 4 ± ± =");
        assert_eq!(keypad.display(), "4.0");
    }

    #[test]
    fn test_empty_evaluate_shows_zero() {
        let mut keypad = Keypad::new();
        keypad.press(&Key::Equals);
        assert_eq!(keypad.display(), "0");
        assert_eq!(keypad.subdisplay(), "0");
    }
}
