//! Query Filter Module
//!
//! Filtered list views keep their state in the URL query string so they can
//! be bookmarked, shared and reloaded. This module owns that state:
//! - The canonical schema of filter keys, defaults and parsers
//! - The [`Navigator`] abstraction over "current URL, replace URL"
//! - [`QueryFilterStore`], the only reader and writer of filter parameters
//! - [`BookFilters`], a typed snapshot handed to the remote list endpoint

pub mod book_filters;
pub mod navigator;
pub mod schema;
pub mod store;

// Re-export commonly used types for convenience
pub use book_filters::BookFilters;
pub use navigator::{MemoryNavigator, Navigator};
pub use schema::{FilterKey, FilterValue, SortOrder};
pub use store::{FilterBatch, QueryFilterStore};
