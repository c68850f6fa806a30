//! Order and payment statuses and how they are presented.

use serde::{Deserialize, Serialize};

/// Semantic colour class of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    Neutral,
    Info,
    Success,
    Warning,
    Danger,
}

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
    /// Any status this client does not know yet.
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    pub fn tone(&self) -> BadgeTone {
        match self {
            OrderStatus::Pending => BadgeTone::Warning,
            OrderStatus::Processing | OrderStatus::Shipped => BadgeTone::Info,
            OrderStatus::Delivered => BadgeTone::Success,
            OrderStatus::Cancelled => BadgeTone::Danger,
            OrderStatus::Refunded | OrderStatus::Unknown => BadgeTone::Neutral,
        }
    }
}

/// Payment status of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    pub fn tone(&self) -> BadgeTone {
        match self {
            PaymentStatus::Pending => BadgeTone::Warning,
            PaymentStatus::Paid => BadgeTone::Success,
            PaymentStatus::Failed => BadgeTone::Danger,
            PaymentStatus::Refunded | PaymentStatus::Unknown => BadgeTone::Neutral,
        }
    }
}
