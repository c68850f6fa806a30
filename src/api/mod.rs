//! Remote Store API Module
//!
//! Typed access to the store's REST API (books, orders, user profile):
//! - Wire models for requests and responses
//! - [`ApiError`], the single error type every call returns
//! - The [`StoreApi`] trait and its reqwest implementation

pub mod client;
pub mod error;
pub mod models;

// Re-export commonly used types for convenience
pub use client::{HttpStoreApi, StoreApi};
pub use error::{ApiError, ApiResult, GENERIC_ERROR_MESSAGE};
pub use models::{Book, Order, OrderLine, PageMeta, Paginated, SavedAddress, UserProfile};
