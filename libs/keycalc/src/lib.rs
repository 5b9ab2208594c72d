//! keycalc - Keypad calculator core
//!
//! Turns keypad input into canonical expression text, evaluates it over a
//! closed set of functions and constants, and keeps a bounded history of
//! successful evaluations.
//!
//! # Example
//!
//! ```rust
//! use keycalc::CalcSession;
//!
//! let mut calc = CalcSession::new();
//! for key in ["2", "+", "3"] {
//!     calc.append(key);
//! }
//! assert_eq!(calc.evaluate().to_string(), "5");
//!
//! // The result stays in the buffer for chaining
//! calc.append("×");
//! calc.append("2");
//! assert_eq!(calc.evaluate().to_string(), "10");
//! assert_eq!(calc.recent_history(2), ["5*2 = 10", "2+3 = 5"]);
//!
//! calc.append("÷");
//! calc.append("0");
//! assert_eq!(calc.evaluate().to_string(), "Cannot divide by zero");
//! assert_eq!(calc.current_display(), "0");
//! ```
//!
//! # Namespace
//!
//! | Name | Signature | Result |
//! |------|-----------|--------|
//! | `sin`, `cos`, `tan` | `sin(x)` | float, radians |
//! | `sqrt` | `sqrt(x)` | float, `x >= 0` |
//! | `log` | `log(x)` or `log(x, base)` | float, natural log by default |
//! | `log10` | `log10(x)` | float |
//! | `exp` | `exp(x)` | float |
//! | `fabs` | `fabs(x)` | float |
//! | `abs` | `abs(x)` | same type as `x` |
//! | `floor`, `ceil` | `floor(x)` | integer |
//! | `factorial` | `factorial(n)` | integer, `n >= 0` |
//! | `pow` | `pow(x, y)` | float |
//! | `round` | `round(x)` or `round(x, n)` | integer, or type of `x` |
//! | `pi`, `e` | constants | float |

pub mod builtin_functions;
pub mod error;
pub mod evaluator;
pub mod history;
pub mod lexer;
pub mod normalizer;
pub mod numfmt;
pub mod parser;
pub mod session;
pub mod value;

pub use error::{CalcError, Result};
pub use evaluator::{evaluate, evaluate_expression, Evaluation};
pub use history::{HistoryLog, HISTORY_CAPACITY};
pub use session::CalcSession;
pub use value::Value;
