//! Payment Gateway Module
//!
//! Checkout orders are created by a remote gateway behind the
//! [`PaymentGateway`] trait; payment confirmations are checked locally with
//! an HMAC signature.

mod razorpay;
mod signature;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use razorpay::RazorpayGateway;
pub use signature::{sign, verify_signature};

// == Payment Error ==
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Gateway answered with an error
    #[error("{0}")]
    Rejected(String),

    /// Gateway could not be reached or answered garbage
    #[error("Failed to create order: {0}")]
    Transport(String),
}

/// Order as returned by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    #[serde(default)]
    pub entity: String,
    /// Amount in minor currency units
    pub amount: u64,
    pub currency: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: i64,
}

// == Payment Gateway Trait ==
#[async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
    /// Opens a checkout order for `amount_minor` units of `currency`.
    async fn create_order(
        &self,
        amount_minor: u64,
        currency: &str,
    ) -> Result<GatewayOrder, PaymentError>;

    /// Public key id handed to the checkout widget.
    fn key_id(&self) -> &str;
}

/// Converts a major-unit amount to minor units (paise, cents).
pub fn to_minor_units(amount: f64) -> Option<u64> {
    let minor = (amount * 100.0).round();
    (amount.is_finite() && minor >= 1.0).then_some(minor as u64)
}
