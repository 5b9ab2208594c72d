//! Numeric values produced by evaluation
//!
//! Arithmetic is dynamically typed: integers stay integers through `+ - * // % **`
//! and switch to floats on true division, on mixing with a float, or when an
//! `i64` operation overflows.

use crate::error::{CalcError, Result};
use crate::numfmt;
use serde::Serialize;
use std::fmt;

/// Evaluated number
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    pub fn as_f64(self) -> f64 {
        match self {
            Value::Int(i) => i as f64,
            Value::Float(f) => f,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Value::Int(i) => i == 0,
            Value::Float(f) => f == 0.0,
        }
    }

    pub fn neg(self) -> Result<Value> {
        match self {
            Value::Int(i) => Ok(i
                .checked_neg()
                .map(Value::Int)
                .unwrap_or(Value::Float(-(i as f64)))),
            Value::Float(f) => Ok(Value::Float(-f)),
        }
    }

    pub fn add(self, rhs: Value) -> Result<Value> {
        int_or_float(self, rhs, i64::checked_add, |a, b| a + b)
    }

    pub fn sub(self, rhs: Value) -> Result<Value> {
        int_or_float(self, rhs, i64::checked_sub, |a, b| a - b)
    }

    pub fn mul(self, rhs: Value) -> Result<Value> {
        int_or_float(self, rhs, i64::checked_mul, |a, b| a * b)
    }

    /// True division, always a float
    pub fn div(self, rhs: Value) -> Result<Value> {
        if rhs.is_zero() {
            return Err(CalcError::DivisionByZero);
        }
        finite(self.as_f64() / rhs.as_f64())
    }

    /// Floor division
    pub fn floor_div(self, rhs: Value) -> Result<Value> {
        if rhs.is_zero() {
            return Err(CalcError::DivisionByZero);
        }
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => match a.checked_div(b) {
                Some(q) if a % b != 0 && ((a < 0) != (b < 0)) => Ok(Value::Int(q - 1)),
                Some(q) => Ok(Value::Int(q)),
                None => finite(float_divmod(a as f64, b as f64).0),
            },
            _ => finite(float_divmod(self.as_f64(), rhs.as_f64()).0),
        }
    }

    /// Modulo, the result takes the sign of the divisor
    pub fn rem(self, rhs: Value) -> Result<Value> {
        if rhs.is_zero() {
            return Err(CalcError::DivisionByZero);
        }
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => {
                let r = a.wrapping_rem(b);
                if r != 0 && ((r < 0) != (b < 0)) {
                    Ok(Value::Int(r + b))
                } else {
                    Ok(Value::Int(r))
                }
            },
            _ => finite(float_divmod(self.as_f64(), rhs.as_f64()).1),
        }
    }

    /// Exponentiation (`**`)
    pub fn pow(self, rhs: Value) -> Result<Value> {
        if let (Value::Int(base), Value::Int(exp)) = (self, rhs) {
            if exp >= 0 {
                match base {
                    0 | 1 if exp > 0 => return Ok(Value::Int(base)),
                    -1 => return Ok(Value::Int(if exp % 2 == 0 { 1 } else { -1 })),
                    _ => {},
                }
                let exact = u32::try_from(exp)
                    .ok()
                    .and_then(|e| base.checked_pow(e));
                return match exact {
                    Some(v) => Ok(Value::Int(v)),
                    None => finite((base as f64).powf(exp as f64)),
                };
            }
        }

        let (x, y) = (self.as_f64(), rhs.as_f64());
        if x == 0.0 && y < 0.0 {
            return Err(CalcError::DivisionByZero);
        }
        if x < 0.0 && y.is_finite() && y.fract() != 0.0 {
            return Err(CalcError::invalid(
                "negative base with fractional exponent has no real result",
            ));
        }
        finite(x.powf(y))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => f.write_str(&numfmt::int_to_string(*i)),
            Value::Float(x) => f.write_str(&numfmt::float_to_string(*x)),
        }
    }
}

/// Wrap a float result, rejecting overflow and NaN
pub(crate) fn finite(x: f64) -> Result<Value> {
    if x.is_finite() {
        Ok(Value::Float(x))
    } else {
        Err(CalcError::invalid("numerical result out of range"))
    }
}

fn int_or_float(
    lhs: Value,
    rhs: Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value> {
    if let (Value::Int(a), Value::Int(b)) = (lhs, rhs) {
        if let Some(v) = int_op(a, b) {
            return Ok(Value::Int(v));
        }
    }
    finite(float_op(lhs.as_f64(), rhs.as_f64()))
}

/// Floor quotient and modulo of two floats, `b != 0`
fn float_divmod(a: f64, b: f64) -> (f64, f64) {
    let mut modulo = a % b;
    let mut div = (a - modulo) / b;
    if modulo != 0.0 {
        if (b < 0.0) != (modulo < 0.0) {
            modulo += b;
            div -= 1.0;
        }
    } else {
        modulo = 0.0_f64.copysign(b);
    }

    let floordiv = if div != 0.0 {
        let mut floordiv = div.floor();
        if div - floordiv > 0.5 {
            floordiv += 1.0;
        }
        floordiv
    } else {
        0.0_f64.copysign(a / b)
    };
    (floordiv, modulo)
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_int_arithmetic_stays_int() {
        assert_eq!(Value::Int(2).add(Value::Int(3)).unwrap(), Value::Int(5));
        assert_eq!(Value::Int(2).sub(Value::Int(3)).unwrap(), Value::Int(-1));
        assert_eq!(Value::Int(4).mul(Value::Int(3)).unwrap(), Value::Int(12));
    }

    #[test]
    fn test_mixed_arithmetic_is_float() {
        assert_eq!(
            Value::Int(2).add(Value::Float(0.5)).unwrap(),
            Value::Float(2.5)
        );
        assert_eq!(Value::Int(4).div(Value::Int(2)).unwrap(), Value::Float(2.0));
    }

    #[test]
    fn test_int_overflow_promotes_to_float() {
        let v = Value::Int(i64::MAX).add(Value::Int(1)).unwrap();
        assert!(matches!(v, Value::Float(_)));
        assert!(matches!(Value::Int(i64::MIN).neg().unwrap(), Value::Float(_)));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            Value::Int(5).div(Value::Int(0)),
            Err(CalcError::DivisionByZero)
        );
        assert_eq!(
            Value::Float(5.0).floor_div(Value::Float(0.0)),
            Err(CalcError::DivisionByZero)
        );
        assert_eq!(
            Value::Int(5).rem(Value::Int(0)),
            Err(CalcError::DivisionByZero)
        );
        assert_eq!(
            Value::Int(0).pow(Value::Int(-1)),
            Err(CalcError::DivisionByZero)
        );
    }

    #[test]
    fn test_floor_div_and_rem_follow_divisor_sign() {
        assert_eq!(Value::Int(7).floor_div(Value::Int(2)).unwrap(), Value::Int(3));
        assert_eq!(Value::Int(-7).floor_div(Value::Int(2)).unwrap(), Value::Int(-4));
        assert_eq!(Value::Int(-7).rem(Value::Int(3)).unwrap(), Value::Int(2));
        assert_eq!(Value::Int(7).rem(Value::Int(-3)).unwrap(), Value::Int(-2));
        assert_eq!(
            Value::Float(-7.5).floor_div(Value::Int(2)).unwrap(),
            Value::Float(-4.0)
        );
        assert_eq!(
            Value::Float(-7.5).rem(Value::Int(2)).unwrap(),
            Value::Float(0.5)
        );
    }

    #[test]
    fn test_pow() {
        assert_eq!(Value::Int(2).pow(Value::Int(10)).unwrap(), Value::Int(1024));
        assert_eq!(Value::Int(2).pow(Value::Int(-1)).unwrap(), Value::Float(0.5));
        assert_eq!(
            Value::Float(4.0).pow(Value::Float(0.5)).unwrap(),
            Value::Float(2.0)
        );
        assert!(Value::Int(-8).pow(Value::Float(0.5)).is_err());
        assert!(Value::Float(10.0).pow(Value::Int(400)).is_err());
    }

    #[test]
    fn test_pow_unit_bases_with_huge_exponents() {
        let huge = Value::Int(4_294_967_296);
        let odd = Value::Int(4_294_967_297);
        assert_eq!(Value::Int(1).pow(huge).unwrap(), Value::Int(1));
        assert_eq!(Value::Int(0).pow(huge).unwrap(), Value::Int(0));
        assert_eq!(Value::Int(-1).pow(huge).unwrap(), Value::Int(1));
        assert_eq!(Value::Int(-1).pow(odd).unwrap(), Value::Int(-1));
        assert_eq!(Value::Int(0).pow(Value::Int(0)).unwrap(), Value::Int(1));
        assert_eq!(Value::Int(-1).pow(Value::Int(i64::MAX)).unwrap(), Value::Int(-1));
        assert!(Value::Int(2).pow(huge).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Int(5).to_string(), "5");
        assert_eq!(Value::Float(5.0).to_string(), "5.0");
        assert_eq!(Value::Float(0.25).to_string(), "0.25");
    }
}
