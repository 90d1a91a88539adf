use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

use thiserror::Error;

/// A monetary amount fixed at two decimal places.
///
/// Every constructor rounds to 2 dp, so equality between two `Money` values
/// is exact post-rounding equality — the engine never compares amounts with
/// a tolerance band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(Decimal);

#[derive(Debug, Clone, Error, PartialEq)]
#[error("invalid amount: '{0}'")]
pub struct ParseMoneyError(pub String);

impl Money {
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    pub fn to_cents(self) -> i64 {
        (self.0 * Decimal::from(100)).to_i64().unwrap_or(0)
    }

    pub fn from_decimal(decimal: Decimal) -> Self {
        Money(decimal.round_dp(2))
    }

    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// The smallest representable difference between two amounts.
    pub fn cent() -> Self {
        Money(Decimal::new(1, 2))
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn abs(self) -> Self {
        Money(self.0.abs())
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    /// Parses a price field from an order-history export. Tolerates a
    /// leading currency symbol and thousands separators; an empty field or
    /// the literal `0` (free items, promotional credits) parses as zero.
    pub fn parse_price(s: &str) -> Result<Self, ParseMoneyError> {
        let cleaned = s.trim().replace(['$', ','], "");
        let cleaned = cleaned.trim();
        if cleaned.is_empty() || cleaned == "0" {
            return Ok(Money::zero());
        }
        Decimal::from_str(cleaned)
            .map(Money::from_decimal)
            .map_err(|_| ParseMoneyError(s.trim().to_string()))
    }
}

impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned = s.trim().trim_start_matches('$');
        Decimal::from_str(cleaned)
            .map(Money::from_decimal)
            .map_err(|_| ParseMoneyError(s.trim().to_string()))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Money(self.0 - rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |a, b| a + b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_cents_round_trip() {
        assert_eq!(Money::from_cents(1420).to_cents(), 1420);
        assert_eq!(Money::from_cents(0).to_cents(), 0);
    }

    #[test]
    fn from_decimal_rounds_to_two_places() {
        let m = Money::from_decimal(Decimal::from_str("14.199").unwrap());
        assert_eq!(m, Money::from_cents(1420));
    }

    #[test]
    fn parse_plain() {
        assert_eq!("36.65".parse::<Money>().unwrap(), Money::from_cents(3665));
    }

    #[test]
    fn parse_with_dollar_sign() {
        assert_eq!("$36.65".parse::<Money>().unwrap(), Money::from_cents(3665));
    }

    #[test]
    fn parse_invalid() {
        assert!("abc".parse::<Money>().is_err());
        assert!("".parse::<Money>().is_err());
    }

    #[test]
    fn parse_price_empty_is_zero() {
        assert_eq!(Money::parse_price("").unwrap(), Money::zero());
        assert_eq!(Money::parse_price("  ").unwrap(), Money::zero());
    }

    #[test]
    fn parse_price_literal_zero_is_zero() {
        assert_eq!(Money::parse_price("0").unwrap(), Money::zero());
        assert_eq!(Money::parse_price("$0").unwrap(), Money::zero());
    }

    #[test]
    fn parse_price_with_thousands_separator() {
        assert_eq!(
            Money::parse_price("$1,234.56").unwrap(),
            Money::from_cents(123456)
        );
    }

    #[test]
    fn parse_price_invalid() {
        assert!(Money::parse_price("free").is_err());
    }

    #[test]
    fn sum_is_exact_in_cents() {
        // 0.1 + 0.2 style residue must not appear with Decimal backing.
        let total: Money = [Money::from_cents(10), Money::from_cents(20)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_cents(30));
    }

    #[test]
    fn display_format() {
        assert_eq!(Money::from_cents(1420).to_string(), "$14.20");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn abs_and_cent() {
        let diff = Money::from_cents(10) - Money::from_cents(25);
        assert_eq!(diff.abs(), Money::from_cents(15));
        assert_eq!(Money::cent(), Money::from_cents(1));
    }
}
