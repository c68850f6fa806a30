//! Order submission state machine
//!
//! `Idle -> Submitting -> Succeeded | Failed`. A failed attempt can be
//! retried straight away; the draft is left untouched.

use serde::Serialize;
use thiserror::Error;

/// Path of the confirmation view for an order.
pub fn confirmation_path(order_id: &str) -> String {
    format!("/orders/{}", order_id)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// A submission for this checkout is already in flight.
    #[error("an order submission is already in progress")]
    AlreadySubmitting,

    /// A result arrived while no submission was in flight.
    #[error("no order submission is in progress")]
    NotSubmitting,
}

/// Where a checkout's submission currently stands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    #[serde(rename_all = "camelCase")]
    Succeeded { order_id: String },
    /// Behaves like `Idle` for the next attempt, but keeps the message for display.
    Failed { message: String },
}

impl SubmissionState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionState::Submitting)
    }

    /// Enters `Submitting`. Rejected while another submission is pending.
    pub fn begin(&mut self) -> Result<(), SubmissionError> {
        if self.is_submitting() {
            return Err(SubmissionError::AlreadySubmitting);
        }
        *self = SubmissionState::Submitting;
        Ok(())
    }

    /// Records the server-assigned order id; returns the confirmation path.
    pub fn succeed(&mut self, order_id: impl Into<String>) -> Result<String, SubmissionError> {
        if !self.is_submitting() {
            return Err(SubmissionError::NotSubmitting);
        }
        let order_id = order_id.into();
        let path = confirmation_path(&order_id);
        *self = SubmissionState::Succeeded { order_id };
        Ok(path)
    }

    /// Records the error message exactly as the server sent it.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), SubmissionError> {
        if !self.is_submitting() {
            return Err(SubmissionError::NotSubmitting);
        }
        *self = SubmissionState::Failed {
            message: message.into(),
        };
        Ok(())
    }

    /// Back to `Idle`, e.g. when a new item is selected.
    pub fn reset(&mut self) {
        *self = SubmissionState::Idle;
    }
}
