//! Type-safe price representation using decimal arithmetic.
//!
//! All storefront prices are US dollars. Amounts are kept at full decimal
//! precision and only rounded to cents where money is derived (tax) or
//! displayed.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative amount of money in US dollars.
///
/// ```
/// use bloom_core::Price;
///
/// let rose = Price::from_cents(8999);
/// assert_eq!(rose.to_string(), "$89.99");
/// assert_eq!(rose.times(2).to_string(), "$179.98");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Currency symbol used when displaying prices.
    pub const SYMBOL: &'static str = "$";

    /// Create a price from a decimal amount in dollars.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// The amount in dollars.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether this price is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// This price multiplied by a quantity.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// This price scaled by a rate (e.g. `0.10` for ten percent), rounded to cents.
    ///
    /// Negative rates are treated as zero.
    #[must_use]
    pub fn scaled(self, rate: Decimal) -> Self {
        Self(self.0 * rate.max(Decimal::ZERO)).rounded()
    }

    /// This price rounded to whole cents (half away from zero).
    #[must_use]
    pub fn rounded(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:.2}", Self::SYMBOL, self.rounded().0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_price_rejected() {
        let err = Price::new(Decimal::new(-1, 2)).unwrap_err();
        assert_eq!(err, PriceError::Negative(Decimal::new(-1, 2)));
        assert_eq!(err.to_string(), "price cannot be negative (got -0.01)");
    }

    #[test]
    fn test_zero_price_accepted() {
        assert_eq!(Price::new(Decimal::ZERO).unwrap(), Price::ZERO);
        assert!(Price::ZERO.is_zero());
    }

    #[test]
    fn test_display_pads_to_cents() {
        assert_eq!(Price::new(Decimal::from(25)).unwrap().to_string(), "$25.00");
        assert_eq!(Price::from_cents(5).to_string(), "$0.05");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        let price = Price::new(Decimal::new(12_345, 3)).unwrap();
        assert_eq!(price.to_string(), "$12.35");
    }

    #[test]
    fn test_times_and_sum() {
        let lines = [Price::from_cents(1000).times(2), Price::from_cents(500).times(1)];
        let total: Price = lines.into_iter().sum();
        assert_eq!(total, Price::from_cents(2500));
    }

    #[test]
    fn test_scaled_rounds_to_cents() {
        let subtotal = Price::from_cents(12_999);
        assert_eq!(subtotal.scaled(Decimal::new(10, 2)), Price::from_cents(1300));
    }

    #[test]
    fn test_scaled_ignores_negative_rate() {
        assert_eq!(
            Price::from_cents(1000).scaled(Decimal::new(-10, 2)),
            Price::ZERO
        );
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        let ok: Price = serde_json::from_str("\"19.99\"").unwrap();
        assert_eq!(ok, Price::from_cents(1999));

        let err = serde_json::from_str::<Price>("\"-3.00\"");
        assert!(err.is_err());
    }
}
