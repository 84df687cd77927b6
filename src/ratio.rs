// Copyright (c) 2017-2021 Fabian Schuiki

//! Rational arithmetic helpers
//!
//! All times and output levels in the simulator are exact rationals. This
//! module provides the constants the engine compares against, parsing of
//! rational literals as they appear in circuit descriptions, and a decimal
//! rendering for human consumption.

use num::{traits::*, BigInt, BigRational};
use regex::Regex;
use std::{
    fmt::{Debug, Display},
    sync::OnceLock,
};

/// An exact time or output level.
pub type Ratio = BigRational;

/// The number of fractional digits shown by `Decimal`.
const DECIMAL_DIGITS: usize = 9;

/// The rational `0`, the settled low output level.
pub fn zero() -> Ratio {
    Ratio::zero()
}

/// The rational `1`, the settled high output level.
pub fn one() -> Ratio {
    Ratio::one()
}

/// The rational `1/2`, the logic threshold.
pub fn one_half() -> Ratio {
    Ratio::new(BigInt::one(), BigInt::from(2))
}

/// Create a rational from a numerator and denominator.
///
/// Panics if `denom` is zero.
pub fn ratio(numer: i64, denom: i64) -> Ratio {
    Ratio::new(BigInt::from(numer), BigInt::from(denom))
}

/// Create a rational from an integer.
pub fn int(value: i64) -> Ratio {
    Ratio::from_integer(BigInt::from(value))
}

/// Convert a boolean logic level into its settled output level.
pub fn level(value: bool) -> Ratio {
    if value {
        one()
    } else {
        zero()
    }
}

/// Parse a rational literal.
///
/// Accepts integers (`-3`), decimals (`1.25`), and fractions (`101/100`).
/// Returns `None` for anything else, including a zero denominator.
pub fn parse_ratio(input: &str) -> Option<Ratio> {
    static LITERAL: OnceLock<Option<Regex>> = OnceLock::new();
    let re = LITERAL
        .get_or_init(|| Regex::new(r"^(-?)(\d+)(?:\.(\d+)|/(\d+))?$").ok())
        .as_ref()?;
    let caps = re.captures(input.trim())?;
    let negative = !caps.get(1)?.as_str().is_empty();
    let mut numer: BigInt = caps.get(2)?.as_str().parse().ok()?;
    let mut denom = BigInt::one();
    if let Some(frac) = caps.get(3) {
        let scale = num::pow(BigInt::from(10), frac.as_str().len());
        let frac: BigInt = frac.as_str().parse().ok()?;
        numer = numer * &scale + frac;
        denom = scale;
    } else if let Some(d) = caps.get(4) {
        denom = d.as_str().parse().ok()?;
        if denom.is_zero() {
            return None;
        }
    }
    if negative {
        numer = -numer;
    }
    Some(Ratio::new(numer, denom))
}

/// A wrapper that displays a rational as a rounded decimal number.
///
/// Trailing zeros are dropped; `1/3` renders as `0.333333333` and `3/2` as
/// `1.5`.
pub struct Decimal<'a>(pub &'a Ratio);

impl Display for Decimal<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write_ratio_as_decimal(self.0, f)
    }
}

impl Debug for Decimal<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

fn write_ratio_as_decimal(ratio: &Ratio, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    let scale = Ratio::from_integer(num::pow(BigInt::from(10), DECIMAL_DIGITS));
    let scaled = (ratio * scale).round().to_integer();
    if scaled.is_zero() {
        return write!(f, "0");
    }
    if scaled.is_negative() {
        write!(f, "-")?;
    }
    let digits = format!("{:0>width$}", scaled.abs(), width = DECIMAL_DIGITS + 1);
    let (whole, frac) = digits.split_at(digits.len() - DECIMAL_DIGITS);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        write!(f, "{}", whole)
    } else {
        write!(f, "{}.{}", whole, frac)
    }
}
