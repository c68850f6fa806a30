//! Checkout Helpers
//!
//! Session cookie handling and order draft assembly.

use super::models::{BuyNowItem, OrderDraft, SubmitOrderInput};
use super::validation::{validate_address, validate_quantity, ValidationErrors};
use crate::checkout::models::PaymentMethod;
use crate::pricing::{PricingCalculator, ShippingMethod};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::Response;
use uuid::Uuid;

/// Name of the cookie that identifies a checkout session.
pub const SESSION_COOKIE: &str = "store_session";

/// Returns the session id from the request cookie, or a new one.
///
/// The boolean is `true` when the id was just created and the response must
/// set the cookie.
pub fn resolve_session_id(headers: &HeaderMap) -> (String, bool) {
    let existing = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string());

    match existing {
        Some(id) => (id, false),
        None => (Uuid::new_v4().simple().to_string(), true),
    }
}

/// Adds the session cookie to `response` when the session is new.
pub fn with_session_cookie(mut response: Response, session_id: &str, is_new: bool) -> Response {
    if is_new {
        let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, session_id);
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
    }
    response
}

/// Validates a submission against the selected item and prices it.
///
/// All field errors are collected before returning, so the form can show
/// every problem at once. Nothing here talks to the network.
pub fn build_order_draft(
    item: &BuyNowItem,
    input: &SubmitOrderInput,
    pricing: &PricingCalculator,
    currency: &str,
) -> Result<OrderDraft, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    validate_address(&input.shipping_address, &mut errors);

    let quantity = validate_quantity(input.quantity, item.stock)
        .map_err(|message| errors.add("quantity", message))
        .ok();

    let shipping_method = input
        .shipping_method
        .parse::<ShippingMethod>()
        .map_err(|e| errors.add("shippingMethod", e.to_string()))
        .ok();

    let payment_method = input
        .payment_method
        .parse::<PaymentMethod>()
        .map_err(|message| errors.add("paymentMethod", message))
        .ok();

    let (Some(quantity), Some(shipping_method), Some(payment_method)) =
        (quantity, shipping_method, payment_method)
    else {
        return Err(errors);
    };
    errors.into_result()?;

    let pricing = pricing
        .quote(item.unit_price, quantity, shipping_method)
        .map_err(|e| {
            let mut errors = ValidationErrors::new();
            errors.add("unitPrice", e.to_string());
            errors
        })?;

    let customer_notes = input
        .customer_notes
        .as_deref()
        .map(str::trim)
        .filter(|notes| !notes.is_empty())
        .map(str::to_string);

    Ok(OrderDraft {
        book_id: item.book_id.clone(),
        quantity,
        unit_price: item.unit_price,
        pricing,
        shipping_method,
        payment_method,
        shipping_address: input.shipping_address.trimmed(),
        currency: currency.to_string(),
        customer_notes,
    })
}
