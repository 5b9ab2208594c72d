//! Calculator session
//!
//! [`CalcSession`] owns the expression buffer and the history log and exposes
//! the operations a keypad front end drives.

use crate::evaluator::{self, Evaluation};
use crate::history::HistoryLog;
use crate::normalizer;

/// One calculator: buffer, history and the last evaluation outcome
#[derive(Debug, Clone, Default)]
pub struct CalcSession {
    buffer: String,
    history: HistoryLog,
    showing_error: bool,
}

impl CalcSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a keypad token, normalizing keypad glyphs
    pub fn append(&mut self, raw: &str) {
        self.showing_error = false;
        normalizer::append(&mut self.buffer, raw);
    }

    pub fn toggle_sign(&mut self) {
        self.showing_error = false;
        normalizer::toggle_sign(&mut self.buffer);
    }

    pub fn invert(&mut self) {
        self.showing_error = false;
        normalizer::invert(&mut self.buffer);
    }

    pub fn backspace(&mut self) {
        self.showing_error = false;
        normalizer::backspace(&mut self.buffer);
    }

    pub fn clear(&mut self) {
        self.showing_error = false;
        normalizer::clear(&mut self.buffer);
    }

    /// Evaluate the buffer; see [`evaluator::evaluate`]
    pub fn evaluate(&mut self) -> Evaluation {
        let outcome = evaluator::evaluate(&mut self.buffer, &mut self.history);
        self.showing_error = outcome.is_error();
        outcome
    }

    /// Buffer text, or `0` when empty
    pub fn current_display(&self) -> &str {
        normalizer::current_display(&self.buffer)
    }

    /// Whether the last action was an evaluation that failed
    ///
    /// Front ends keep the error text on screen while this is set.
    pub fn showing_error(&self) -> bool {
        self.showing_error
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Up to `n` most recent history records, newest first
    pub fn recent_history(&self, n: usize) -> Vec<&str> {
        self.history.recent(n).collect()
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypad_flow() {
        let mut session = CalcSession::new();
        for key in ["2", "×", "3", "^", "2"] {
            session.append(key);
        }
        assert_eq!(session.current_display(), "2*3**2");

        assert_eq!(session.evaluate().to_string(), "18");
        assert_eq!(session.current_display(), "18");
        assert_eq!(session.recent_history(5), ["2*3**2 = 18"]);
    }

    #[test]
    fn test_error_flag_tracks_last_outcome() {
        let mut session = CalcSession::new();
        session.append("5");
        session.append("÷");
        session.append("0");

        assert_eq!(session.evaluate().to_string(), "Cannot divide by zero");
        assert!(session.showing_error());
        assert_eq!(session.current_display(), "0");

        session.append("7");
        assert!(!session.showing_error());
        assert_eq!(session.current_display(), "7");
    }

    #[test]
    fn test_invert_then_evaluate() {
        let mut session = CalcSession::new();
        session.append("4");
        session.invert();
        assert_eq!(session.buffer(), "1/(4)");
        assert_eq!(session.evaluate().to_string(), "0.25");
    }

    #[test]
    fn test_clear_keeps_history() {
        let mut session = CalcSession::new();
        session.append("1+1");
        session.evaluate();
        session.clear();
        assert_eq!(session.current_display(), "0");
        assert_eq!(session.history().len(), 1);
    }
}
