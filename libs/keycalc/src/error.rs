//! Error types for keycalc

use thiserror::Error;

/// Evaluation errors
///
/// Exactly two kinds are observable by callers. Their `Display` output is the
/// fixed text shown on the calculator display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("Cannot divide by zero")]
    DivisionByZero,

    /// The detail is kept for logs only and never reaches the display.
    #[error("Invalid expression")]
    InvalidExpression(String),
}

impl CalcError {
    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::InvalidExpression(detail.into())
    }

    /// Internal reason behind the error, used for debug logging
    pub fn detail(&self) -> &str {
        match self {
            Self::DivisionByZero => "division by zero",
            Self::InvalidExpression(detail) => detail,
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
