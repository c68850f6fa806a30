//! Catalog Module
//!
//! Filtered, paginated book listing driven by the URL query.

pub mod handlers;

pub use handlers::routes;
