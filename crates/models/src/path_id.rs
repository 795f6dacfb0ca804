//! Id segments taken from request paths.
//!
//! The raw segment is coerced to a number with loose, `Number(text)`-style
//! rules and compared to stored ids numerically. Text that is not a number
//! becomes NaN, which equals no id, so a malformed segment simply finds
//! nothing instead of failing to parse.

use std::fmt;

/// Numeric value of an `:id` path segment.
#[derive(Clone, Copy, Debug)]
pub struct PathId(f64);

impl PathId {
    pub fn parse(raw: &str) -> Self {
        Self(coerce(raw))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Strict numeric equality against a stored id; NaN matches nothing.
    pub fn matches(self, id: i64) -> bool {
        id as f64 == self.0
    }
}

impl fmt::Display for PathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn coerce(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }
    if let Some(v) = radix_literal(s) {
        return v;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    // `str::parse::<f64>` also knows "inf" and "nan", which are not numbers here.
    let decimal = s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !decimal {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// `0x`, `0o` and `0b` literals. Signs are not allowed after the prefix.
fn radix_literal(s: &str) -> Option<f64> {
    let radix = match s.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = &s[2..];
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Some(f64::NAN);
    }
    Some(u128::from_str_radix(digits, radix).map_or(f64::NAN, |v| v as f64))
}
