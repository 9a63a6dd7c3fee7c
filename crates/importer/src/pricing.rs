//! Conversion of upstream prices into stored minor-unit prices.
//!
//! All arithmetic is done in `Decimal` and rounded half away from zero, so
//! `0.125` becomes `13` minor units rather than whatever the nearest binary
//! float happens to round to.

use crate::{ImporterError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Percentage added on top of the upstream price. `100` doubles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Markup {
    percent: u32,
}

impl Markup {
    pub fn percent(percent: u32) -> Self {
        Self { percent }
    }

    pub fn as_percent(&self) -> u32 {
        self.percent
    }

    /// `minor + round(minor * percent / 100)`
    pub fn apply(&self, minor: i32) -> Result<i32> {
        let scaled = Decimal::from(minor)
            .checked_mul(Decimal::from(self.percent))
            .ok_or_else(|| overflow(Decimal::from(minor)))?;
        let extra = to_i32(round(scaled / Decimal::ONE_HUNDRED))?;

        minor
            .checked_add(extra)
            .ok_or_else(|| overflow(Decimal::from(minor) + Decimal::from(extra)))
    }
}

impl Default for Markup {
    fn default() -> Self {
        Self::percent(100)
    }
}

/// Upstream and resale price of one entry, both in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub smshub_price: i32,
    pub our_price: i32,
}

impl Quote {
    pub fn new(cost: Decimal, markup: Markup) -> Result<Self> {
        let smshub_price = to_minor_units(cost)?;
        let our_price = markup.apply(smshub_price)?;

        Ok(Self {
            smshub_price,
            our_price,
        })
    }
}

pub fn to_minor_units(cost: Decimal) -> Result<i32> {
    if cost.is_sign_negative() && !cost.is_zero() {
        return Err(ImporterError::TransformationError(format!(
            "negative price {}",
            cost
        )));
    }

    let minor = cost
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(|| overflow(cost))?;

    to_i32(round(minor))
}

fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

fn to_i32(value: Decimal) -> Result<i32> {
    value.to_i32().ok_or_else(|| overflow(value))
}

fn overflow(value: Decimal) -> ImporterError {
    ImporterError::TransformationError(format!("price {} does not fit in minor units", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(to_minor_units(dec("1.50")).unwrap(), 150);
        assert_eq!(to_minor_units(dec("0")).unwrap(), 0);
        assert_eq!(to_minor_units(dec("12")).unwrap(), 1200);
        assert_eq!(to_minor_units(dec("0.333")).unwrap(), 33);
    }

    #[test]
    fn test_minor_units_round_half_away_from_zero() {
        assert_eq!(to_minor_units(dec("0.125")).unwrap(), 13);
        assert_eq!(to_minor_units(dec("0.005")).unwrap(), 1);
        assert_eq!(to_minor_units(dec("2.345")).unwrap(), 235);
        assert_eq!(to_minor_units(dec("0.0049")).unwrap(), 0);
    }

    #[test]
    fn test_negative_cost_rejected() {
        assert!(to_minor_units(dec("-0.01")).is_err());
    }

    #[test]
    fn test_huge_cost_rejected() {
        assert!(to_minor_units(dec("100000000000")).is_err());
    }

    #[test]
    fn test_cost_beyond_decimal_range_is_an_error() {
        let err = to_minor_units(dec("1000000000000000000000000000")).unwrap_err();
        assert!(matches!(err, ImporterError::TransformationError(_)));

        let err = Quote::new(dec("79228162514264337593543950335"), Markup::default()).unwrap_err();
        assert!(matches!(err, ImporterError::TransformationError(_)));
    }

    #[test]
    fn test_huge_markup_is_an_error() {
        assert!(Markup::percent(u32::MAX).apply(i32::MAX).is_err());
    }

    #[test]
    fn test_markup_of_100_doubles() {
        let markup = Markup::default();
        for raw in ["0.01", "0.125", "1.50", "7.77", "19.995", "250"] {
            let quote = Quote::new(dec(raw), markup).unwrap();
            assert_eq!(quote.our_price, 2 * quote.smshub_price, "raw price {}", raw);
        }
    }

    #[test]
    fn test_markup_rounds_extra_half_away_from_zero() {
        // 25 * 50% = 12.5 -> 13
        assert_eq!(Markup::percent(50).apply(25).unwrap(), 38);
        // 33 * 10% = 3.3 -> 3
        assert_eq!(Markup::percent(10).apply(33).unwrap(), 36);
        assert_eq!(Markup::percent(0).apply(150).unwrap(), 150);
    }

    #[test]
    fn test_quote_for_reference_entry() {
        let quote = Quote::new(dec("1.50"), Markup::percent(100)).unwrap();
        assert_eq!(
            quote,
            Quote {
                smshub_price: 150,
                our_price: 300
            }
        );
    }

    #[test]
    fn test_markup_overflow_is_an_error() {
        assert!(Markup::percent(100).apply(i32::MAX).is_err());
    }
}
