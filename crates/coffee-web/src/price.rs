//! Fixed-point prices.
//!
//! Prices are kept in cents and travel as text (`9.99`) through forms,
//! data attributes and the CSV export.

use serde::{Deserialize, Deserializer, de};
use std::fmt;
use std::str::FromStr;

/// Largest accepted price, in cents.
pub const MAX_CENTS: i64 = u16::MAX as i64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    #[error("invalid price: {0:?}")]
    Invalid(String),
    #[error("invalid price fraction: {0:?}")]
    Fraction(String),
    #[error("price too large")]
    TooLarge,
}

/// A non-negative price in cents, at most [`MAX_CENTS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(i64);

impl Price {
    /// Build a price from a cents value read back from storage.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        if cents < 0 {
            return Err(PriceError::Invalid(cents.to_string()));
        }
        if cents > MAX_CENTS {
            return Err(PriceError::TooLarge);
        }
        Ok(Self(cents))
    }

    pub fn cents(self) -> i64 {
        self.0
    }
}

fn parse_part(part: &str, input: &str) -> Result<i64, PriceError> {
    // `u16::from_str` accepts a leading '+', prices never carry a sign
    if part.starts_with('+') {
        return Err(PriceError::Invalid(input.to_string()));
    }
    part.parse::<u16>()
        .map(i64::from)
        .map_err(|_| PriceError::Invalid(input.to_string()))
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();

        let cents = match input.split_once('.') {
            Some((whole, fraction)) => {
                let scale = match fraction.len() {
                    1 => 10,
                    2 => 1,
                    _ => return Err(PriceError::Fraction(input.to_string())),
                };
                let whole = parse_part(whole, input)?;
                let fraction = parse_part(fraction, input)? * scale;
                whole * 100 + fraction
            }
            None => parse_part(input, input)? * 100,
        };

        Self::from_cents(cents)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}
