//! Strongly-typed value objects used by the product domain.
//!
//! Identifiers and prices are carried as wrappers instead of raw primitives so
//! that conversions to and from storage happen in one place.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// Price text could not be read as a two-digit decimal.
    #[error("invalid price {0:?}: expected a decimal with at most two fractional digits")]
    InvalidPrice(String),
}

/// Identifier of a stored product.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ProductId(i32);

impl ProductId {
    /// Creates a new identifier ensuring it is greater than zero.
    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NonPositiveId("product_id"))
        }
    }

    /// Returns the raw `i32` backing this identifier.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for ProductId {
    type Error = TypeConstraintError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Monetary amount with exactly two fractional digits, held as minor units.
///
/// Any amount can be represented, including zero and negatives; whether an
/// amount is acceptable as a product price is decided by validation.
/// Serialized as decimal text (`"10.50"`) so no precision is lost.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct ProductPrice(i64);

impl ProductPrice {
    /// Smallest acceptable product price, `0.01`.
    pub const MIN: ProductPrice = ProductPrice(1);
    /// Largest amount a `decimal(10,2)` column holds, `99999999.99`.
    pub const MAX: ProductPrice = ProductPrice(9_999_999_999);

    /// Builds a price from a number of cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the amount in cents.
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// `true` when the amount is strictly greater than zero.
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl Display for ProductPrice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl FromStr for ProductPrice {
    type Err = TypeConstraintError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || TypeConstraintError::InvalidPrice(value.to_string());

        let trimmed = value.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) if !fraction.is_empty() => (whole, fraction),
            Some(_) => return Err(invalid()),
            None => (digits, ""),
        };

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty())
            || fraction.len() > 2
            || !all_digits(whole)
            || !all_digits(fraction)
        {
            return Err(invalid());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let fraction: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(fraction))
            .ok_or_else(invalid)?;

        Ok(Self(if negative { -cents } else { cents }))
    }
}

impl TryFrom<String> for ProductPrice {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProductPrice> for String {
    fn from(value: ProductPrice) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_id_rejects_non_positive_values() {
        assert!(ProductId::new(1).is_ok());
        assert_eq!(
            ProductId::new(0),
            Err(TypeConstraintError::NonPositiveId("product_id"))
        );
        assert!(ProductId::try_from(-5).is_err());
    }

    #[test]
    fn price_parses_decimal_text() {
        assert_eq!("10".parse::<ProductPrice>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<ProductPrice>().unwrap().cents(), 1050);
        assert_eq!("10.05".parse::<ProductPrice>().unwrap().cents(), 1005);
        assert_eq!(".99".parse::<ProductPrice>().unwrap().cents(), 99);
        assert_eq!(" 0.01 ".parse::<ProductPrice>().unwrap(), ProductPrice::MIN);
        assert_eq!("-1.00".parse::<ProductPrice>().unwrap().cents(), -100);
        assert_eq!("+3".parse::<ProductPrice>().unwrap().cents(), 300);
    }

    #[test]
    fn price_rejects_malformed_text() {
        for input in ["", "-", ".", "10.", "1.234", "abc", "1,50", "1.2.3", "--1", "1e3"] {
            assert!(
                input.parse::<ProductPrice>().is_err(),
                "{input:?} should not parse"
            );
        }
        assert!("99999999999999999999".parse::<ProductPrice>().is_err());
    }

    #[test]
    fn price_formats_with_two_fraction_digits() {
        assert_eq!(ProductPrice::from_cents(1050).to_string(), "10.50");
        assert_eq!(ProductPrice::from_cents(7).to_string(), "0.07");
        assert_eq!(ProductPrice::from_cents(-250).to_string(), "-2.50");
        assert_eq!(ProductPrice::MAX.to_string(), "99999999.99");
    }

    #[test]
    fn price_serializes_as_decimal_text() {
        let price = ProductPrice::from_cents(1999);
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"19.99\"");
        let back: ProductPrice = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
        assert!(serde_json::from_str::<ProductPrice>("\"1.999\"").is_err());
    }

    #[test]
    fn price_orders_by_amount() {
        let cheap: ProductPrice = "9.99".parse().unwrap();
        let dear: ProductPrice = "10.00".parse().unwrap();
        assert!(cheap < dear);
        assert!(!ProductPrice::from_cents(0).is_positive());
    }
}
