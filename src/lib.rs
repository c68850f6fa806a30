//! Bookstore Checkout Library
//!
//! This library provides the server side of the book store web client: the
//! URL-driven filter state of list views, checkout pricing, order submission
//! and a typed client for the remote store API.

// Domain modules
pub mod catalog;
pub mod checkout;
pub mod filters;
pub mod orders;
pub mod pricing;

// Infrastructure
pub mod api;
pub mod config;
pub mod error;
pub mod router;
