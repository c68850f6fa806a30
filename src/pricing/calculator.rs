//! Order Pricing Calculator
//!
//! Pure computation of the checkout summary. The calculator trusts that the
//! quantity has already been validated against stock; see
//! [`crate::checkout::validation`].

use super::{Money, PricingError, ShippingMethod, ShippingRates};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default tax rate (15%).
pub fn default_tax_rate() -> Decimal {
    Decimal::new(15, 2)
}

// =============================================================================
// Breakdown
// =============================================================================

/// Derived checkout figures. Never stored; recomputed on every input change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingBreakdown {
    pub subtotal: Money,
    pub tax: Money,
    pub shipping_cost: Money,
    /// Always zero until promotions exist.
    pub discount: Money,
    /// `subtotal + tax + shipping_cost - discount`, exact.
    pub total: Money,
}

impl PricingBreakdown {
    /// Two-decimal strings for each figure, keyed by field name.
    pub fn display(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("subtotal", self.subtotal.display()),
            ("tax", self.tax.display()),
            ("shippingCost", self.shipping_cost.display()),
            ("discount", self.discount.display()),
            ("total", self.total.display()),
        ])
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Computes [`PricingBreakdown`]s from a configured tax rate and shipping rates.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingCalculator {
    tax_rate: Decimal,
    rates: ShippingRates,
}

impl Default for PricingCalculator {
    fn default() -> Self {
        Self::new(default_tax_rate(), ShippingRates::default())
    }
}

impl PricingCalculator {
    pub fn new(tax_rate: Decimal, rates: ShippingRates) -> Self {
        Self { tax_rate, rates }
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// The shared shipping fee lookup.
    pub fn shipping_cost(&self, method: ShippingMethod) -> Money {
        self.rates.cost(method)
    }

    /// Computes the breakdown for `quantity` units at `unit_price`.
    ///
    /// `quantity` is expected to be at least 1 and within stock.
    pub fn quote(
        &self,
        unit_price: Money,
        quantity: u32,
        method: ShippingMethod,
    ) -> Result<PricingBreakdown, PricingError> {
        if unit_price.is_negative() {
            return Err(PricingError::NegativeUnitPrice);
        }

        let subtotal = unit_price.times(quantity);
        let tax = subtotal.scale_by(self.tax_rate);
        let shipping_cost = self.shipping_cost(method);
        let discount = Money::ZERO;
        let total = subtotal + tax + shipping_cost - discount;

        Ok(PricingBreakdown {
            subtotal,
            tax,
            shipping_cost,
            discount,
            total,
        })
    }
}
