//! Pure arithmetic behind the numeric operations.
//!
//! Element coercion lives here too so the validator and the computation agree
//! on exactly which inputs survive. JSON payloads are loosely typed, so each
//! operation accepts numbers plus whatever a loose numeric reading of the
//! other JSON types yields.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Largest integer a JSON number round-trips exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericError {
    #[error("no valid integers")]
    NoValidOperands,

    #[error("result is too large to represent")]
    Overflow,
}

/// A non-negative result: a sequence term or a least common multiple.
///
/// Values stay exact while they fit in `u64`; past that the arithmetic
/// continues in floating point and serializes as a JSON float.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Magnitude {
    Exact(u64),
    Approx(f64),
}

impl Magnitude {
    pub fn as_f64(self) -> f64 {
        match self {
            Magnitude::Exact(v) => v as f64,
            Magnitude::Approx(v) => v,
        }
    }

    fn add(self, other: Magnitude) -> Magnitude {
        match (self, other) {
            (Magnitude::Exact(a), Magnitude::Exact(b)) => match a.checked_add(b) {
                Some(sum) => Magnitude::Exact(sum),
                None => Magnitude::Approx(a as f64 + b as f64),
            },
            (a, b) => Magnitude::Approx(a.as_f64() + b.as_f64()),
        }
    }

    fn lcm(self, n: u64) -> Magnitude {
        match self {
            Magnitude::Exact(a) => match lcm(a, n) {
                Some(v) => Magnitude::Exact(v),
                None => Magnitude::Approx(a as f64 / gcd(a, n) as f64 * n as f64),
            },
            Magnitude::Approx(_) if n == 0 => Magnitude::Exact(0),
            Magnitude::Approx(a) if !a.is_finite() => self,
            Magnitude::Approx(a) => {
                let b = n as f64;
                Magnitude::Approx(a / gcd_f64(a, b) * b)
            }
        }
    }
}

/// First `n` terms of `0, 1, 1, 2, 3, 5, ...`.
pub fn sequence(n: usize) -> Vec<Magnitude> {
    let mut terms = Vec::with_capacity(n);
    let (mut prev, mut curr) = (Magnitude::Exact(0), Magnitude::Exact(1));

    for _ in 0..n {
        terms.push(prev);
        let next = prev.add(curr);
        prev = curr;
        curr = next;
    }

    terms
}

/// True iff `x >= 2` and no `d` in `[2, sqrt(x)]` divides `x`.
pub fn is_prime_candidate(x: i64) -> bool {
    if x < 2 {
        return false;
    }
    if x < 4 {
        return true;
    }
    if x % 2 == 0 {
        return false;
    }

    let mut d = 3;
    // `d <= x / d` is `d * d <= x` without the overflow.
    while d <= x / d {
        if x % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Coerce one element to an integer, truncating toward zero.
///
/// Strings contribute their leading integer prefix (`" 17abc"` is 17).
pub fn truncate_integer(value: &Value) -> Option<i64> {
    let n = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => {
                let f = n.as_f64()?;
                if !f.is_finite() || f.abs() > MAX_SAFE_INTEGER as f64 {
                    return None;
                }
                f.trunc() as i64
            }
        },
        Value::String(s) => parse_integer_prefix(s)?,
        _ => return None,
    };

    (n.unsigned_abs() <= MAX_SAFE_INTEGER as u64).then_some(n)
}

/// Coerce one element to a GCD/LCM operand: `|floor(x)|` of its loose
/// numeric reading.
///
/// `null`, `false`, blank strings and `[]` read as 0 and `true` as 1. A
/// one-element array reads as its element. Objects, longer arrays and
/// unparsable strings are dropped.
pub fn operand(value: &Value) -> Option<u64> {
    let f = loose_number(value)?;
    if !f.is_finite() {
        return None;
    }
    let magnitude = f.floor().abs();
    (magnitude <= MAX_SAFE_INTEGER as f64).then_some(magnitude as u64)
}

fn loose_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_loose_number(s),
        Value::Array(items) => match items.as_slice() {
            [] => Some(0.0),
            // A lone element is read through its text form, where booleans
            // and objects stop being numeric.
            [Value::Bool(_) | Value::Object(_)] => None,
            [only] => loose_number(only),
            _ => None,
        },
        Value::Object(_) => None,
    }
}

/// Decimal or exponent notation, or a `0x`/`0o`/`0b` literal. Blank is 0.
fn parse_loose_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Some(0.0);
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &s[2..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return None;
        }
        return u64::from_str_radix(digits, radix).ok().map(|v| v as f64);
    }

    s.parse::<f64>().ok()
}

/// Every element of `values` that survives integer coercion, in order.
pub fn integers(values: &[Value]) -> Vec<i64> {
    values.iter().filter_map(truncate_integer).collect()
}

/// Every element of `values` that survives operand coercion, in order.
pub fn operands(values: &[Value]) -> Vec<u64> {
    values.iter().filter_map(operand).collect()
}

/// Primes among the coercible elements of `values`, preserving input order.
///
/// Anything other than an array yields an empty list rather than an error.
pub fn filter_primes(values: &Value) -> Vec<i64> {
    match values.as_array() {
        Some(items) => integers(items)
            .into_iter()
            .filter(|&x| is_prime_candidate(x))
            .collect(),
        None => Vec::new(),
    }
}

pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Euclid on floats; `%` is exact for finite operands.
fn gcd_f64(mut a: f64, mut b: f64) -> f64 {
    while b != 0.0 {
        (a, b) = (b, a % b);
    }
    a
}

/// `None` on overflow. A zero operand makes the result zero.
pub fn lcm(a: u64, b: u64) -> Option<u64> {
    if a == 0 || b == 0 {
        return Some(0);
    }
    (a / gcd(a, b)).checked_mul(b)
}

pub fn reduce_gcd(values: &[Value]) -> Result<u64, NumericError> {
    let nums = operands(values);
    let (first, rest) = nums.split_first().ok_or(NumericError::NoValidOperands)?;
    Ok(rest.iter().fold(*first, |acc, &n| gcd(acc, n)))
}

/// Exact while the running multiple fits in `u64`, approximate after that.
/// Fails only when even the float result is infinite.
pub fn reduce_lcm(values: &[Value]) -> Result<Magnitude, NumericError> {
    let nums = operands(values);
    let (first, rest) = nums.split_first().ok_or(NumericError::NoValidOperands)?;
    let result = rest
        .iter()
        .fold(Magnitude::Exact(*first), |acc, &n| acc.lcm(n));

    if result.as_f64().is_finite() {
        Ok(result)
    } else {
        Err(NumericError::Overflow)
    }
}

/// Leading optionally-signed decimal digits after leading whitespace.
fn parse_integer_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
