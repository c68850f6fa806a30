//! Shipping methods and flat rates
//!
//! Every consumer that needs a shipping fee asks [`ShippingRates::cost`];
//! the fees themselves come from configuration.

use super::{Money, PricingError};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShippingMethod {
    Standard,
    Express,
    Pickup,
}

impl ShippingMethod {
    /// All methods, in the order they are offered at checkout.
    pub const ALL: [ShippingMethod; 3] = [
        ShippingMethod::Standard,
        ShippingMethod::Express,
        ShippingMethod::Pickup,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShippingMethod::Standard => "standard",
            ShippingMethod::Express => "express",
            ShippingMethod::Pickup => "pickup",
        }
    }
}

impl fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShippingMethod {
    type Err = PricingError;

    /// Unknown methods are an error; there is no fallback method.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(ShippingMethod::Standard),
            "express" => Ok(ShippingMethod::Express),
            "pickup" => Ok(ShippingMethod::Pickup),
            other => Err(PricingError::UnknownShippingMethod(other.to_string())),
        }
    }
}

/// Flat shipping fee per method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingRates {
    pub standard: Money,
    pub express: Money,
    pub pickup: Money,
}

impl Default for ShippingRates {
    fn default() -> Self {
        Self {
            standard: Money::from_major(30),
            express: Money::from_major(50),
            pickup: Money::ZERO,
        }
    }
}

impl ShippingRates {
    /// Returns the fee charged for `method`.
    pub fn cost(&self, method: ShippingMethod) -> Money {
        match method {
            ShippingMethod::Standard => self.standard,
            ShippingMethod::Express => self.express,
            ShippingMethod::Pickup => self.pickup,
        }
    }
}
