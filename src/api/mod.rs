//! API Module
//!
//! HTTP handlers and routing for the storefront and admin REST API, served
//! under `/api/v1`.
//!
//! # Route groups
//! - `/user` - registration and user lookup
//! - `/product` - catalogue, search and admin product management
//! - `/order` - checkout and order fulfilment
//! - `/payment` - gateway orders, signature verification and coupons
//! - `/dashboard` - cached admin analytics

mod extract;
pub mod handlers;
pub mod routes;
mod state;

pub use extract::AdminUser;
pub use routes::create_router;
pub use state::AppState;

#[cfg(test)]
pub(crate) mod test_support;
