//! Checkout Domain Models
//!
//! This module contains the data structures of the buy-now checkout flow:
//! request bodies, the transient buy-now selection and the order draft
//! assembled at submit time.

use super::submission::SubmissionState;
use crate::api::models::{OrderLine, SavedAddress};
use crate::pricing::{Money, PricingBreakdown, PricingError, ShippingMethod};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

// =============================================================================
// Shared value types
// =============================================================================

/// Returns the default quantity (1) for a purchase
fn default_quantity() -> u32 {
    1
}

/// Where the order is shipped. All five fields are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
}

impl ShippingAddress {
    /// `(wire name, value)` for each field, in form order.
    pub fn fields(&self) -> [(&'static str, &str); 5] {
        [
            ("street", self.street.as_str()),
            ("city", self.city.as_str()),
            ("state", self.state.as_str()),
            ("country", self.country.as_str()),
            ("zipCode", self.zip_code.as_str()),
        ]
    }

    /// Copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            street: self.street.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            country: self.country.trim().to_string(),
            zip_code: self.zip_code.trim().to_string(),
        }
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "card")]
    Card,
    #[serde(rename = "paypal")]
    PayPal,
    #[serde(rename = "cash_on_delivery")]
    CashOnDelivery,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::PayPal => "paypal",
            PaymentMethod::CashOnDelivery => "cash_on_delivery",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(PaymentMethod::Card),
            "paypal" => Ok(PaymentMethod::PayPal),
            "cash_on_delivery" => Ok(PaymentMethod::CashOnDelivery),
            other => Err(format!("unknown payment method: {:?}", other)),
        }
    }
}

// =============================================================================
// Buy-now selection and draft
// =============================================================================

/// A single item picked with "Buy now", carried into checkout without a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyNowItem {
    pub book_id: String,
    pub title: String,
    pub unit_price: Money,
    /// Stock when the item was last fetched.
    pub stock: u32,
    pub quantity: u32,
}

/// Everything needed to create an order, assembled at submit time.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub book_id: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub pricing: PricingBreakdown,
    pub shipping_method: ShippingMethod,
    pub payment_method: PaymentMethod,
    pub shipping_address: ShippingAddress,
    pub currency: String,
    pub customer_notes: Option<String>,
}

impl OrderDraft {
    /// The order-creation payload line for this draft.
    pub fn to_order_line(&self) -> OrderLine {
        OrderLine {
            book_id: self.book_id.clone(),
            quantity: self.quantity,
            payment_method: self.payment_method,
            shipping_address: self.shipping_address.clone(),
            price: self.unit_price.amount(),
            subtotal: self.pricing.subtotal.amount(),
            tax: self.pricing.tax.amount(),
            shipping: self.pricing.shipping_cost.amount(),
            discount: self.pricing.discount.amount(),
            total: self.pricing.total.amount(),
            currency: self.currency.clone(),
            shipping_method: self.shipping_method,
            customer_notes: self.customer_notes.clone(),
        }
    }
}

// =============================================================================
// Request bodies
// =============================================================================

/// Body of `PUT /buy-now`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyNowInput {
    pub book_id: String,

    /// Quantity to buy (defaults to 1)
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// Body of `POST /checkout/quote`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteInput {
    pub unit_price: Money,

    #[serde(default = "default_quantity")]
    pub quantity: u32,

    pub shipping_method: String,

    /// When present, the quantity is checked against it.
    #[serde(default)]
    pub stock: Option<u32>,
}

impl QuoteInput {
    pub fn shipping_method(&self) -> Result<ShippingMethod, PricingError> {
        self.shipping_method.parse()
    }
}

/// Body of `POST /checkout`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderInput {
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    #[serde(default)]
    pub shipping_method: String,

    #[serde(default)]
    pub payment_method: String,

    #[serde(default)]
    pub shipping_address: ShippingAddress,

    #[serde(default)]
    pub customer_notes: Option<String>,
}

// =============================================================================
// Responses
// =============================================================================

/// A pricing breakdown plus its display strings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub breakdown: PricingBreakdown,
    pub display: std::collections::BTreeMap<&'static str, String>,
}

impl From<PricingBreakdown> for QuoteResponse {
    fn from(breakdown: PricingBreakdown) -> Self {
        Self {
            display: breakdown.display(),
            breakdown,
        }
    }
}

/// Response of a successful `POST /checkout`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderResponse {
    pub status: String,
    pub order_id: String,
    /// Confirmation view to navigate to.
    pub redirect: String,
}

/// One independently loaded part of the checkout page.
#[derive(Debug, Serialize)]
pub struct Section<T> {
    pub status: SectionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionStatus {
    Ready,
    Empty,
    /// Loaded, but cannot be bought as it stands (e.g. sold out).
    Unavailable,
    Error,
}

impl<T> Section<T> {
    pub fn ready(data: T) -> Self {
        Self {
            status: SectionStatus::Ready,
            data: Some(data),
            message: None,
        }
    }

    pub fn empty() -> Self {
        Self {
            status: SectionStatus::Empty,
            data: None,
            message: None,
        }
    }

    pub fn unavailable(data: T, message: impl Into<String>) -> Self {
        Self {
            status: SectionStatus::Unavailable,
            data: Some(data),
            message: Some(message.into()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: SectionStatus::Error,
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }
}

/// A shipping method with its fee, as offered on the checkout page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingOption {
    pub method: ShippingMethod,
    pub cost: Money,
}

/// Response of `PUT /buy-now`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyNowResponse {
    pub status: String,
    pub item: BuyNowItem,
    pub quote: QuoteResponse,
}

/// Response of `GET /checkout`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPageResponse {
    pub item: Section<BuyNowItem>,
    pub addresses: Section<Vec<SavedAddress>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_address_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<QuoteResponse>,
    pub shipping_options: Vec<ShippingOption>,
    pub submission: SubmissionState,
}
