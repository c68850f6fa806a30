//! Checkout input validation
//!
//! Field-level checks that run before anything reaches the pricing
//! calculator or the remote API. Errors are keyed by the form field's wire
//! name so the client can show them next to the offending input.

use super::models::ShippingAddress;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Field name → message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error for `field`; the first message per field wins.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `Ok(())` when no error was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Every address field must be non-blank.
pub fn validate_address(address: &ShippingAddress, errors: &mut ValidationErrors) {
    for (field, value) in address.fields() {
        if value.trim().is_empty() {
            errors.add(
                format!("shippingAddress.{}", field),
                format!("{} is required", field),
            );
        }
    }
}

/// Accepts `1..=stock`. Anything else is rejected, never adjusted.
pub fn validate_quantity(quantity: u32, stock: u32) -> Result<u32, String> {
    if stock == 0 {
        return Err("This item is out of stock".to_string());
    }
    if quantity < 1 {
        return Err("Quantity must be at least 1".to_string());
    }
    if quantity > stock {
        return Err(format!("Only {} left in stock", stock));
    }
    Ok(quantity)
}

/// Keeps a quantity stepper within `1..=stock`.
pub fn clamp_quantity(quantity: u32, stock: u32) -> u32 {
    quantity.clamp(1, stock.max(1))
}
