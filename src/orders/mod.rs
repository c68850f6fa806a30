//! Orders Domain Module
//!
//! Order confirmation view and the status badge mapping shared by every
//! order listing.

pub mod handlers;
pub mod status;

pub use handlers::routes;
pub use status::{BadgeTone, OrderStatus, PaymentStatus};
