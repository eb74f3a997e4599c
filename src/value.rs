//! Numeric values.
//!
//! Charm keeps two numeric representations: exact arbitrary-precision
//! integers and floating-point numbers. Which one a literal becomes is
//! decided purely by its spelling: a token containing `.` is a float,
//! anything else is an integer.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;

use crate::error::ParseError;

/// A numeric value: exact integer or float.
#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    /// Arbitrary-precision signed integer.
    Integer(BigInt),
    /// Floating-point number, for `.`-bearing literals.
    Float(f64),
}

impl Number {
    /// Create an integer value.
    pub fn integer(n: impl Into<BigInt>) -> Self {
        Number::Integer(n.into())
    }

    /// Create a float value.
    pub fn float(n: f64) -> Self {
        Number::Float(n)
    }
}

impl FromStr for Number {
    type Err = ParseError;

    /// Convert a numeric token.
    ///
    /// The caller has already classified the token as numeric (digits,
    /// `-`, `.` only); whether it actually denotes a number is the
    /// number library's call. `1.2.3` gets here and is rejected below.
    fn from_str(token: &str) -> Result<Self, ParseError> {
        if token.contains('.') {
            token
                .parse::<f64>()
                .map(Number::Float)
                .map_err(|e| ParseError::InvalidNumber {
                    token: token.to_owned(),
                    reason: e.to_string(),
                })
        } else {
            token
                .parse::<BigInt>()
                .map(Number::Integer)
                .map_err(|e| ParseError::InvalidNumber {
                    token: token.to_owned(),
                    reason: e.to_string(),
                })
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(n) => write!(f, "{}", n),
            Number::Float(n) => {
                // keep a `.` in the spelling so the value re-reads as a float
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}.", n)
                } else {
                    write!(f, "{}", n)
                }
            }
        }
    }
}
