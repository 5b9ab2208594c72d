//! Result formatting
//!
//! Converts evaluated numbers to their default display form.
//! Uses `itoa` for integers and `ryu` for floats, then lays the float digits
//! out in the calculator's display notation.
//!
//! # Float notation
//!
//! | Value | Display |
//! |-------|---------|
//! | `5.0` | `5.0` |
//! | `0.25` | `0.25` |
//! | `0.0001` | `0.0001` |
//! | `0.00001` | `1e-05` |
//! | `1e16` | `1e+16` |
//! | `-0.0` | `-0.0` |
//!
//! Fixed notation is used while the decimal exponent lies in `[-4, 16)`,
//! scientific notation otherwise.

/// Smallest decimal exponent rendered in fixed notation
const FIXED_MIN_EXP: i32 = -4;
/// First decimal exponent rendered in scientific notation
const FIXED_MAX_EXP: i32 = 16;

/// Format an integer
#[inline]
pub fn int_to_string(n: i64) -> String {
    let mut buffer = itoa::Buffer::new();
    buffer.format(n).to_owned()
}

/// Format a float using shortest round-trip digits
pub fn float_to_string(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let mut buffer = ryu::Buffer::new();
    let raw = buffer.format_finite(n.abs());
    let (digits, point) = decompose(raw);

    let mut out = String::with_capacity(digits.len() + 8);
    if n.is_sign_negative() {
        out.push('-');
    }

    if digits.is_empty() {
        out.push_str("0.0");
        return out;
    }

    // Exponent of the leading digit: d.ddd x 10^exp
    let exp = point - 1;
    if (FIXED_MIN_EXP..FIXED_MAX_EXP).contains(&exp) {
        write_fixed(&mut out, &digits, point);
    } else {
        write_scientific(&mut out, &digits, exp);
    }
    out
}

/// Split ryu output into significant digits and the decimal point position
///
/// The value equals `0.<digits> x 10^point`. Leading and trailing zeros are
/// stripped, so zero yields an empty digit string.
fn decompose(raw: &str) -> (String, i32) {
    let (mantissa, exp) = match raw.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (raw, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let mut digits: String = int_part.chars().chain(frac_part.chars()).collect();
    let mut point = int_part.len() as i32 + exp;

    let leading = digits.len() - digits.trim_start_matches('0').len();
    digits.drain(..leading);
    point -= leading as i32;

    let trimmed = digits.trim_end_matches('0').len();
    digits.truncate(trimmed);

    (digits, point)
}

fn write_fixed(out: &mut String, digits: &str, point: i32) {
    if point <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take((-point) as usize));
        out.push_str(digits);
        return;
    }

    let point = point as usize;
    if point >= digits.len() {
        out.push_str(digits);
        out.extend(std::iter::repeat('0').take(point - digits.len()));
        out.push_str(".0");
    } else {
        out.push_str(&digits[..point]);
        out.push('.');
        out.push_str(&digits[point..]);
    }
}

fn write_scientific(out: &mut String, digits: &str, exp: i32) {
    out.push_str(&digits[..1]);
    if digits.len() > 1 {
        out.push('.');
        out.push_str(&digits[1..]);
    }
    out.push('e');
    out.push(if exp < 0 { '-' } else { '+' });
    let magnitude = exp.unsigned_abs();
    if magnitude < 10 {
        out.push('0');
    }
    let mut buffer = itoa::Buffer::new();
    out.push_str(buffer.format(magnitude));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_to_string() {
        assert_eq!(int_to_string(0), "0");
        assert_eq!(int_to_string(-42), "-42");
        assert_eq!(int_to_string(1234567890123), "1234567890123");
    }

    #[test]
    fn test_float_fixed_notation() {
        assert_eq!(float_to_string(0.0), "0.0");
        assert_eq!(float_to_string(5.0), "5.0");
        assert_eq!(float_to_string(0.25), "0.25");
        assert_eq!(float_to_string(-123.456), "-123.456");
        assert_eq!(float_to_string(0.0001), "0.0001");
        assert_eq!(float_to_string(1e15), "1000000000000000.0");
        assert_eq!(float_to_string(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn test_float_scientific_notation() {
        assert_eq!(float_to_string(1e16), "1e+16");
        assert_eq!(float_to_string(0.00001), "1e-05");
        assert_eq!(float_to_string(1.5e-7), "1.5e-07");
        assert_eq!(float_to_string(2.5e100), "2.5e+100");
        assert_eq!(float_to_string(-1.2345678901234567e20), "-1.2345678901234567e+20");
    }

    #[test]
    fn test_float_signed_zero_and_non_finite() {
        assert_eq!(float_to_string(-0.0), "-0.0");
        assert_eq!(float_to_string(f64::INFINITY), "inf");
        assert_eq!(float_to_string(f64::NEG_INFINITY), "-inf");
        assert_eq!(float_to_string(f64::NAN), "nan");
    }
}
