//! Checkout Pricing Module
//!
//! This module turns a unit price, a quantity and a shipping method into the
//! figures shown on the checkout summary:
//! - Money amounts backed by a decimal type
//! - Shipping methods and their configured flat rates
//! - The pricing calculator and its breakdown

pub mod calculator;
pub mod money;
pub mod shipping;

use thiserror::Error;

// Re-export commonly used types for convenience
pub use calculator::{PricingBreakdown, PricingCalculator};
pub use money::Money;
pub use shipping::{ShippingMethod, ShippingRates};

/// Errors raised while interpreting pricing inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// The shipping method is not one of `standard`, `express` or `pickup`.
    #[error("unknown shipping method: {0:?}")]
    UnknownShippingMethod(String),

    /// A money amount could not be parsed as a decimal number.
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    /// A unit price below zero was supplied.
    #[error("unit price must not be negative")]
    NegativeUnitPrice,
}
