//! Built-in functions and constants
//!
//! The namespace is closed: these names are the only identifiers an
//! expression can resolve.
//!
//! | Function | Signature | Result |
//! |----------|-----------|--------|
//! | `sin` `cos` `tan` | `f(x)`, radians | float |
//! | `sqrt` | `sqrt(x)`, `x >= 0` | float |
//! | `log` | `log(x)` or `log(x, base)` | float |
//! | `log10` | `log10(x)` | float |
//! | `exp` | `exp(x)` | float |
//! | `fabs` | `fabs(x)` | float |
//! | `abs` | `abs(x)` | same type as `x` |
//! | `floor` `ceil` | `f(x)` | int |
//! | `factorial` | `factorial(n)`, int `n >= 0` | int |
//! | `pow` | `pow(x, y)` | float |
//! | `round` | `round(x)` or `round(x, ndigits)` | int, or type of `x` |

use crate::error::{CalcError, Result};
use crate::value::{finite, Value};
use std::fmt;

/// Named constants
pub const CONSTANTS: &[(&str, f64)] = &[
    ("pi", std::f64::consts::PI),
    ("e", std::f64::consts::E),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Sin,
    Cos,
    Tan,
    Sqrt,
    Log,
    Log10,
    Exp,
    Fabs,
    Abs,
    Floor,
    Ceil,
    Factorial,
    Pow,
    Round,
}

impl Builtin {
    pub const ALL: [Builtin; 14] = [
        Builtin::Sin,
        Builtin::Cos,
        Builtin::Tan,
        Builtin::Sqrt,
        Builtin::Log,
        Builtin::Log10,
        Builtin::Exp,
        Builtin::Fabs,
        Builtin::Abs,
        Builtin::Floor,
        Builtin::Ceil,
        Builtin::Factorial,
        Builtin::Pow,
        Builtin::Round,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Sin => "sin",
            Builtin::Cos => "cos",
            Builtin::Tan => "tan",
            Builtin::Sqrt => "sqrt",
            Builtin::Log => "log",
            Builtin::Log10 => "log10",
            Builtin::Exp => "exp",
            Builtin::Fabs => "fabs",
            Builtin::Abs => "abs",
            Builtin::Floor => "floor",
            Builtin::Ceil => "ceil",
            Builtin::Factorial => "factorial",
            Builtin::Pow => "pow",
            Builtin::Round => "round",
        }
    }

    pub fn lookup(name: &str) -> Option<Builtin> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    /// Accepted argument counts (inclusive)
    fn arity(self) -> (usize, usize) {
        match self {
            Builtin::Log | Builtin::Round => (1, 2),
            Builtin::Pow => (2, 2),
            _ => (1, 1),
        }
    }

    /// Apply the function to evaluated arguments
    pub fn call(self, args: &[Value]) -> Result<Value> {
        let (min, max) = self.arity();
        if args.len() < min || args.len() > max {
            return Err(CalcError::invalid(format!(
                "{}() takes {} argument(s), {} given",
                self.name(),
                if min == max {
                    min.to_string()
                } else {
                    format!("{} to {}", min, max)
                },
                args.len()
            )));
        }

        let x = args[0];
        match self {
            Builtin::Sin => finite(x.as_f64().sin()),
            Builtin::Cos => finite(x.as_f64().cos()),
            Builtin::Tan => finite(x.as_f64().tan()),
            Builtin::Sqrt => sqrt(x),
            Builtin::Log => match args.get(1) {
                None => ln(x),
                Some(&base) => log_base(x, base),
            },
            Builtin::Log10 => {
                domain_positive(x)?;
                finite(x.as_f64().log10())
            },
            Builtin::Exp => finite(x.as_f64().exp()),
            Builtin::Fabs => finite(x.as_f64().abs()),
            Builtin::Abs => abs(x),
            Builtin::Floor => to_integral(x, f64::floor),
            Builtin::Ceil => to_integral(x, f64::ceil),
            Builtin::Factorial => factorial(x),
            Builtin::Pow => pow(x, args[1]),
            Builtin::Round => match args.get(1) {
                None => to_integral(x, f64::round_ties_even),
                Some(&ndigits) => round_to(x, ndigits),
            },
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<built-in function {}>", self.name())
    }
}

/// Look up a named constant
pub fn constant(name: &str) -> Option<f64> {
    CONSTANTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, value)| *value)
}

fn domain_positive(x: Value) -> Result<()> {
    if x.as_f64() > 0.0 {
        Ok(())
    } else {
        Err(CalcError::invalid("math domain error"))
    }
}

fn sqrt(x: Value) -> Result<Value> {
    let x = x.as_f64();
    if x < 0.0 {
        return Err(CalcError::invalid("math domain error"));
    }
    finite(x.sqrt())
}

fn ln(x: Value) -> Result<Value> {
    domain_positive(x)?;
    finite(x.as_f64().ln())
}

fn log_base(x: Value, base: Value) -> Result<Value> {
    let num = ln(x)?;
    let den = ln(base)?;
    num.div(den)
}

fn abs(x: Value) -> Result<Value> {
    match x {
        Value::Int(i) => Ok(i
            .checked_abs()
            .map(Value::Int)
            .unwrap_or(Value::Float((i as f64).abs()))),
        Value::Float(f) => Ok(Value::Float(f.abs())),
    }
}

/// Round a float to an integral value, keeping integers as they are
fn to_integral(x: Value, op: fn(f64) -> f64) -> Result<Value> {
    match x {
        Value::Int(_) => Ok(x),
        Value::Float(f) if !f.is_finite() => Err(CalcError::invalid(
            "cannot convert non-finite float to integer",
        )),
        Value::Float(f) => {
            let r = op(f);
            if r >= i64::MIN as f64 && r < i64::MAX as f64 {
                Ok(Value::Int(r as i64))
            } else {
                Ok(Value::Float(r))
            }
        },
    }
}

fn factorial(n: Value) -> Result<Value> {
    let n = match n {
        Value::Int(n) if n >= 0 => n,
        Value::Int(_) => {
            return Err(CalcError::invalid(
                "factorial() not defined for negative values",
            ))
        },
        Value::Float(_) => {
            return Err(CalcError::invalid(
                "factorial() only accepts integral values",
            ))
        },
    };

    let mut acc = Value::Int(1);
    for k in 2..=n {
        acc = acc.mul(Value::Int(k))?;
    }
    Ok(acc)
}

fn pow(x: Value, y: Value) -> Result<Value> {
    let (x, y) = (x.as_f64(), y.as_f64());
    if x == 0.0 && y < 0.0 {
        return Err(CalcError::invalid("math domain error"));
    }
    if x < 0.0 && y.is_finite() && y.fract() != 0.0 {
        return Err(CalcError::invalid("math domain error"));
    }
    finite(x.powf(y))
}

/// `round(x, ndigits)`, ties to even
fn round_to(x: Value, ndigits: Value) -> Result<Value> {
    let Value::Int(ndigits) = ndigits else {
        return Err(CalcError::invalid("round() ndigits must be an integer"));
    };

    match x {
        Value::Int(i) => {
            if ndigits >= 0 {
                return Ok(x);
            }
            // Digits beyond i64 range round everything to zero
            let Some(scale) = u32::try_from(ndigits.unsigned_abs())
                .ok()
                .and_then(|e| 10_i128.checked_pow(e))
            else {
                return Ok(Value::Int(0));
            };
            let i = i128::from(i);
            let (q, r) = (i.div_euclid(scale), i.rem_euclid(scale));
            let twice = 2 * r;
            let q = if twice > scale || (twice == scale && q % 2 != 0) {
                q + 1
            } else {
                q
            };
            let rounded = q * scale;
            Ok(i64::try_from(rounded)
                .map(Value::Int)
                .unwrap_or(Value::Float(rounded as f64)))
        },
        Value::Float(f) if f.is_finite() => round_float(f, ndigits),
        Value::Float(_) => Ok(x),
    }
}

/// Fractional digits needed to print any finite `f64` exactly
const EXACT_DIGITS: usize = 1074;

/// Round `f` to `ndigits` places on its exact decimal expansion, ties to even,
/// and parse the rounded decimal back to the nearest double
fn round_float(f: f64, ndigits: i64) -> Result<Value> {
    if ndigits >= EXACT_DIGITS as i64 {
        return Ok(Value::Float(f));
    }
    // Every finite double is below 1e309, so anything coarser rounds to zero
    let ndigits = ndigits.max(-400);

    let exact = format!("{:.*}", EXACT_DIGITS, f.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes())
        .map(|b| b - b'0')
        .collect();

    let keep = int_part.len() as i64 + ndigits;
    let mut kept: Vec<u8> = match usize::try_from(keep) {
        Ok(k) => digits[..k].to_vec(),
        Err(_) => Vec::new(),
    };
    let round_up = usize::try_from(keep)
        .ok()
        .and_then(|k| digits.get(k).map(|&d| (k, d)))
        .is_some_and(|(k, d)| {
            let tail_nonzero = digits[k + 1..].iter().any(|&r| r != 0);
            let last_odd = kept.last().is_some_and(|&l| l % 2 == 1);
            d > 5 || (d == 5 && (tail_nonzero || last_odd))
        });

    if round_up {
        let mut i = kept.len();
        loop {
            if i == 0 {
                kept.insert(0, 1);
                break;
            }
            i -= 1;
            if kept[i] == 9 {
                kept[i] = 0;
            } else {
                kept[i] += 1;
                break;
            }
        }
    }

    let mut text: String = kept.iter().map(|&d| char::from(b'0' + d)).collect();
    if text.is_empty() {
        text.push('0');
    }
    let rounded: f64 = format!("{}e{}", text, -ndigits)
        .parse()
        .map_err(|_| CalcError::invalid("round() produced an unreadable value"))?;
    finite(rounded.copysign(f))
}
