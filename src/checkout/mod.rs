//! Checkout Domain Module
//!
//! This module contains the buy-now checkout flow, including:
//! - Domain models (address, buy-now item, order draft, request bodies)
//! - Field validation and the order submission state machine
//! - Application state management
//! - REST API handlers

pub mod handlers;
pub mod helpers;
pub mod models;
pub mod state;
pub mod submission;
pub mod validation;

// Re-export commonly used types for convenience
pub use handlers::routes;
pub use state::{spawn_session_sweeper, AppState, SharedState};
