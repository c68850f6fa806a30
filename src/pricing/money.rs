//! Money amounts
//!
//! All currency math goes through [`Money`], a thin wrapper around
//! [`rust_decimal::Decimal`]. Amounts keep their full precision while being
//! added and multiplied; rounding to two decimals happens only in
//! [`Money::display`].

use super::PricingError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    iter::Sum,
    ops::{Add, Sub},
    str::FromStr,
};

/// Number of decimals shown to the customer.
const DISPLAY_SCALE: u32 = 2;

/// A currency amount in the store's single implied currency.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// The zero amount.
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Wraps an exact decimal amount.
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Builds an amount from integer minor units, e.g. `from_minor(4999)` is `49.99`.
    pub fn from_minor(minor_units: i64) -> Self {
        Self(Decimal::new(minor_units, DISPLAY_SCALE))
    }

    /// Builds a whole-unit amount, e.g. `from_major(30)` is `30`.
    pub fn from_major(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// The exact underlying decimal.
    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Multiplies the amount by a whole quantity.
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Multiplies the amount by a rate such as a tax rate.
    pub fn scale_by(self, rate: Decimal) -> Self {
        Self(self.0 * rate)
    }

    /// The amount rounded half away from zero to two decimals, e.g. `"57.49"`.
    pub fn display(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        format!("{:.2}", rounded)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl FromStr for Money {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(Money)
            .map_err(|_| PricingError::InvalidAmount(s.to_string()))
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}
