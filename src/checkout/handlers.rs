//! REST API handlers for the buy-now checkout flow
//!
//! This module implements the HTTP endpoints behind the checkout page:
//! item selection, the page load, live quotes and order submission.

use super::helpers::{build_order_draft, resolve_session_id, with_session_cookie};
use super::models::*;
use super::state::SharedState;
use super::submission::confirmation_path;
use super::validation::{clamp_quantity, validate_quantity};
use crate::api::ApiError;
use crate::error::AppError;
use crate::pricing::ShippingMethod;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{post, put},
    Json, Router,
};
use futures_util::future::join;
use tracing::{info, warn};

/// Creates routes for checkout operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/buy-now", put(select_buy_now).delete(clear_buy_now))
        .route("/checkout", post(submit_order).get(checkout_page))
        .route("/checkout/quote", post(quote))
}

/// Endpoint: PUT /buy-now
/// Selects a single book for checkout after checking the quantity against stock.
async fn select_buy_now(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<BuyNowInput>,
) -> Result<Response, AppError> {
    let (session_id, is_new_session) = resolve_session_id(&headers);

    let book = state.api.get_book(&payload.book_id).await?;
    let quantity = validate_quantity(payload.quantity, book.stock)
        .map_err(|m| AppError::field("quantity", m))?;

    let item = BuyNowItem {
        book_id: book.id,
        title: book.title,
        unit_price: book.price,
        stock: book.stock,
        quantity,
    };
    let quote = state
        .pricing
        .quote(item.unit_price, quantity, ShippingMethod::Standard)?;

    state.select_buy_now(&session_id, item.clone())?;
    info!(session = %session_id, book = %item.book_id, quantity, "buy-now item selected");

    let response = Json(BuyNowResponse {
        status: "selected".to_string(),
        item,
        quote: quote.into(),
    })
    .into_response();

    Ok(with_session_cookie(response, &session_id, is_new_session))
}

/// Endpoint: DELETE /buy-now
async fn clear_buy_now(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let (session_id, _) = resolve_session_id(&headers);
    if state.clear_buy_now(&session_id)?.is_some() {
        info!(session = %session_id, "buy-now item cleared");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Endpoint: GET /checkout
/// Loads the selected item and the saved addresses concurrently. Each part
/// reports its own status; a failure in one does not hide the other.
async fn checkout_page(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (session_id, is_new_session) = resolve_session_id(&headers);
    let selected = state.buy_now(&session_id);

    let item_load = async {
        let Some(item) = selected.as_ref() else {
            return (Section::empty(), None);
        };
        let book = match state.api.get_book(&item.book_id).await {
            Ok(book) => book,
            Err(e) => {
                warn!(session = %session_id, error = %e, "failed to refresh buy-now item");
                return (Section::failed(e.user_message()), None);
            }
        };

        let refreshed = BuyNowItem {
            unit_price: book.price,
            stock: book.stock,
            quantity: clamp_quantity(item.quantity, book.stock),
            ..item.clone()
        };
        if let Err(message) = validate_quantity(refreshed.quantity, refreshed.stock) {
            return (Section::unavailable(refreshed, message), None);
        }

        let quote = state.pricing.quote(
            refreshed.unit_price,
            refreshed.quantity,
            ShippingMethod::Standard,
        );
        match quote {
            Ok(breakdown) => (Section::ready(refreshed), Some(QuoteResponse::from(breakdown))),
            Err(e) => {
                warn!(session = %session_id, error = %e, "failed to price buy-now item");
                (Section::failed(e.to_string()), None)
            }
        }
    };

    let address_load = async {
        match state.api.get_profile().await {
            Ok(profile) => {
                let default_id = profile.default_address().map(|address| address.id.clone());
                (Section::ready(profile.addresses), default_id)
            }
            Err(e) => {
                warn!(session = %session_id, error = %e, "failed to load saved addresses");
                (Section::failed(e.user_message()), None)
            }
        }
    };

    let ((item, quote), (addresses, default_address_id)) = join(item_load, address_load).await;
    if let Some(refreshed) = item.data() {
        state.refresh_buy_now(&session_id, refreshed);
    }

    let shipping_options = ShippingMethod::ALL
        .into_iter()
        .map(|method| ShippingOption {
            method,
            cost: state.pricing.shipping_cost(method),
        })
        .collect();

    let response = Json(CheckoutPageResponse {
        item,
        addresses,
        default_address_id,
        quote,
        shipping_options,
        submission: state.submission(&session_id),
    })
    .into_response();

    with_session_cookie(response, &session_id, is_new_session)
}

/// Endpoint: POST /checkout/quote
/// Recomputes the summary for the current quantity and shipping method.
async fn quote(
    State(state): State<SharedState>,
    Json(input): Json<QuoteInput>,
) -> Result<Json<QuoteResponse>, AppError> {
    let method = input.shipping_method()?;

    let quantity = match input.stock {
        Some(stock) => validate_quantity(input.quantity, stock),
        None if input.quantity >= 1 => Ok(input.quantity),
        None => Err("Quantity must be at least 1".to_string()),
    }
    .map_err(|m| AppError::field("quantity", m))?;

    let breakdown = state.pricing.quote(input.unit_price, quantity, method)?;
    Ok(Json(breakdown.into()))
}

/// Endpoint: POST /checkout
/// Validates the form, then creates the order. On success the buy-now item
/// is cleared; on failure it is kept so the customer can retry.
async fn submit_order(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(input): Json<SubmitOrderInput>,
) -> Result<Response, AppError> {
    let (session_id, _) = resolve_session_id(&headers);

    let item = state
        .buy_now(&session_id)
        .ok_or_else(|| AppError::NotFound("No item selected for checkout".to_string()))?;

    let draft = build_order_draft(&item, &input, &state.pricing, &state.currency)?;

    state.begin_submission(&session_id)?;
    info!(
        session = %session_id,
        book = %draft.book_id,
        quantity = draft.quantity,
        total = %draft.pricing.total,
        "submitting order"
    );

    let created = state
        .api
        .create_orders(&[draft.to_order_line()])
        .await
        .and_then(|orders| {
            orders
                .into_iter()
                .next()
                .ok_or_else(|| ApiError::Decode("order creation returned no orders".to_string()))
        });

    match created {
        Ok(order) => {
            // The order already exists upstream.
            let redirect = state
                .complete_submission(&session_id, &order.id)
                .unwrap_or_else(|e| {
                    warn!(
                        session = %session_id,
                        order = %order.id,
                        error = %e,
                        "submission state out of sync"
                    );
                    confirmation_path(&order.id)
                });
            info!(session = %session_id, order = %order.id, "order created");

            let body = SubmitOrderResponse {
                status: "succeeded".to_string(),
                order_id: order.id,
                redirect,
            };
            Ok((StatusCode::CREATED, Json(body)).into_response())
        }
        Err(e) => {
            if let Err(state_error) = state.fail_submission(&session_id, &e.user_message()) {
                warn!(session = %session_id, error = %state_error, "submission state out of sync");
            }
            Err(AppError::Api(e))
        }
    }
}
