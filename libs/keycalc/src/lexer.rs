//! Tokenizer for canonical expression text
//!
//! Recognizes numbers, names, `+ - * / // % **`, parentheses and commas.
//! Whitespace between tokens is skipped. Anything else is rejected.

use crate::error::{CalcError, Result};
use crate::value::Value;
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(Value),
    Name(String),
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,
    LParen,
    RParen,
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(v) => write!(f, "{}", v),
            Token::Name(name) => f.write_str(name),
            Token::Plus => f.write_str("+"),
            Token::Minus => f.write_str("-"),
            Token::Star => f.write_str("*"),
            Token::DoubleStar => f.write_str("**"),
            Token::Slash => f.write_str("/"),
            Token::DoubleSlash => f.write_str("//"),
            Token::Percent => f.write_str("%"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Comma => f.write_str(","),
        }
    }
}

/// Split expression text into tokens
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    Lexer {
        chars: input.chars().peekable(),
    }
    .run()
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
}

impl Lexer<'_> {
    fn run(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        while let Some(&ch) = self.chars.peek() {
            let token = match ch {
                c if c.is_whitespace() => {
                    self.chars.next();
                    continue;
                },
                '0'..='9' | '.' => self.number()?,
                c if c.is_ascii_alphabetic() || c == '_' => self.name(),
                '+' => self.single(Token::Plus),
                '-' => self.single(Token::Minus),
                '%' => self.single(Token::Percent),
                '(' => self.single(Token::LParen),
                ')' => self.single(Token::RParen),
                ',' => self.single(Token::Comma),
                '*' => self.doubled('*', Token::Star, Token::DoubleStar),
                '/' => self.doubled('/', Token::Slash, Token::DoubleSlash),
                other => {
                    return Err(CalcError::invalid(format!("unexpected character '{}'", other)))
                },
            };
            tokens.push(token);
        }

        Ok(tokens)
    }

    fn single(&mut self, token: Token) -> Token {
        self.chars.next();
        token
    }

    /// One- or two-character operator such as `*` / `**`
    fn doubled(&mut self, ch: char, one: Token, two: Token) -> Token {
        self.chars.next();
        if self.chars.peek() == Some(&ch) {
            self.chars.next();
            two
        } else {
            one
        }
    }

    fn name(&mut self) -> Token {
        let mut name = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                name.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        Token::Name(name)
    }

    fn number(&mut self) -> Result<Token> {
        let mut text = String::new();
        let mut is_float = false;

        if self.chars.peek() == Some(&'0') {
            text.push('0');
            self.chars.next();
            if let Some(radix) = self.radix_prefix() {
                return self.radix_literal(radix);
            }
        }

        self.digits(&mut text, 10)?;

        if self.chars.peek() == Some(&'.') {
            self.chars.next();
            is_float = true;
            text.push('.');
            if self.chars.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.digits(&mut text, 10)?;
            }
        }
        if text == "." {
            return Err(CalcError::invalid("unexpected '.'"));
        }

        if matches!(self.chars.peek(), Some('e' | 'E')) {
            self.chars.next();
            is_float = true;
            text.push('e');
            if let Some(sign) = self.chars.next_if(|c| matches!(c, '+' | '-')) {
                text.push(sign);
            }
            if !self.chars.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(CalcError::invalid("invalid decimal literal"));
            }
            self.digits(&mut text, 10)?;
        }

        self.reject_trailing_identifier()?;

        if is_float {
            let value = text
                .parse::<f64>()
                .map_err(|e| CalcError::invalid(format!("invalid float literal '{}': {}", text, e)))?;
            return Ok(Token::Number(Value::Float(value)));
        }

        if text.len() > 1 && text.starts_with('0') && text.bytes().any(|b| b != b'0') {
            return Err(CalcError::invalid(
                "leading zeros in decimal integer literals are not permitted",
            ));
        }
        Ok(Token::Number(int_literal(&text, 10)))
    }

    /// Consume `x`, `o` or `b` after a leading zero
    fn radix_prefix(&mut self) -> Option<u32> {
        let radix = match self.chars.peek()? {
            'x' | 'X' => 16,
            'o' | 'O' => 8,
            'b' | 'B' => 2,
            _ => return None,
        };
        self.chars.next();
        Some(radix)
    }

    fn radix_literal(&mut self, radix: u32) -> Result<Token> {
        // Python allows one underscore right after the prefix: 0x_ff
        if self.chars.peek() == Some(&'_') {
            self.chars.next();
        }
        let mut text = String::new();
        if !self.chars.peek().is_some_and(|c| c.is_digit(radix)) {
            return Err(CalcError::invalid("invalid integer literal"));
        }
        self.digits(&mut text, radix)?;
        self.reject_trailing_identifier()?;
        Ok(Token::Number(int_literal(&text, radix)))
    }

    /// Read `digit ('_'? digit)*`, pushing the digits without separators
    fn digits(&mut self, out: &mut String, radix: u32) -> Result<()> {
        let mut last_was_digit = !out.is_empty();
        while let Some(&c) = self.chars.peek() {
            if c.is_digit(radix) {
                out.push(c);
                last_was_digit = true;
            } else if c == '_' {
                if !last_was_digit {
                    return Err(CalcError::invalid("invalid digit separator"));
                }
                last_was_digit = false;
            } else {
                break;
            }
            self.chars.next();
        }
        if !last_was_digit && !out.is_empty() {
            return Err(CalcError::invalid("trailing digit separator"));
        }
        Ok(())
    }

    fn reject_trailing_identifier(&mut self) -> Result<()> {
        match self.chars.peek() {
            Some(&c) if c.is_alphanumeric() || c == '_' => {
                Err(CalcError::invalid("invalid decimal literal"))
            },
            _ => Ok(()),
        }
    }
}

/// Parse integer digits, falling back to a float when they overflow `i64`
fn int_literal(digits: &str, radix: u32) -> Value {
    match i64::from_str_radix(digits, radix) {
        Ok(i) => Value::Int(i),
        Err(_) => Value::Float(
            digits
                .chars()
                .filter_map(|c| c.to_digit(radix))
                .fold(0.0, |acc, d| acc * radix as f64 + d as f64),
        ),
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_operators() {
        let tokens = tokenize("1 + 2 - 3 * 4 / 5 // 6 % 7 ** 8").unwrap();
        let ops: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        assert_eq!(
            ops,
            ["1", "+", "2", "-", "3", "*", "4", "/", "5", "//", "6", "%", "7", "**", "8"]
        );
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(tokenize("12").unwrap(), vec![Token::Number(Value::Int(12))]);
        assert_eq!(tokenize("1.5").unwrap(), vec![Token::Number(Value::Float(1.5))]);
        assert_eq!(tokenize(".5").unwrap(), vec![Token::Number(Value::Float(0.5))]);
        assert_eq!(tokenize("5.").unwrap(), vec![Token::Number(Value::Float(5.0))]);
        assert_eq!(tokenize("1e3").unwrap(), vec![Token::Number(Value::Float(1000.0))]);
        assert_eq!(
            tokenize("2.5E-3").unwrap(),
            vec![Token::Number(Value::Float(0.0025))]
        );
        assert_eq!(
            tokenize("1_000").unwrap(),
            vec![Token::Number(Value::Int(1000))]
        );
        assert_eq!(tokenize("0x1f").unwrap(), vec![Token::Number(Value::Int(31))]);
        assert_eq!(tokenize("00").unwrap(), vec![Token::Number(Value::Int(0))]);
        assert_eq!(tokenize("05.5").unwrap(), vec![Token::Number(Value::Float(5.5))]);
    }

    #[test]
    fn test_oversized_int_literal_becomes_float() {
        let tokens = tokenize("100000000000000000000").unwrap();
        assert_eq!(tokens, vec![Token::Number(Value::Float(1e20))]);
    }

    #[test]
    fn test_malformed_numbers() {
        assert!(tokenize("05").is_err());
        assert!(tokenize("2e").is_err());
        assert!(tokenize("2pi").is_err());
        assert!(tokenize("1__0").is_err());
        assert!(tokenize("1_").is_err());
        assert!(tokenize(".").is_err());
        assert!(tokenize("0x").is_err());
    }

    #[test]
    fn test_names_and_punctuation() {
        assert_eq!(
            tokenize("sqrt(pi, e)").unwrap(),
            vec![
                Token::Name("sqrt".into()),
                Token::LParen,
                Token::Name("pi".into()),
                Token::Comma,
                Token::Name("e".into()),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_rejects_foreign_characters() {
        assert!(tokenize("2^3").is_err());
        assert!(tokenize("2×3").is_err());
        assert!(tokenize("a.b").is_err());
        assert!(tokenize("'x'").is_err());
    }
}
