//! REST API handlers for order confirmation

use super::status::BadgeTone;
use crate::api::Order;
use crate::checkout::state::SharedState;
use crate::error::AppError;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

/// Creates routes for order operations
pub fn routes() -> Router<SharedState> {
    Router::new().route("/orders/:id", get(order_confirmation))
}

/// An order with its presentation hints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order: Order,
    pub status_tone: BadgeTone,
    pub payment_tone: BadgeTone,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_display: Option<String>,
}

impl From<Order> for OrderConfirmation {
    fn from(order: Order) -> Self {
        Self {
            status_tone: order.status.tone(),
            payment_tone: order.payment_status.tone(),
            total_display: order.total.map(|total| total.display()),
            order,
        }
    }
}

/// Endpoint: GET /orders/:id
/// A missing order answers 404 so the client shows its not-found view.
async fn order_confirmation(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<OrderConfirmation>, AppError> {
    let order = state.api.get_order(&id).await?;
    Ok(Json(order.into()))
}
