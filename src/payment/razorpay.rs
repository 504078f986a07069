//! Razorpay Orders API client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{GatewayOrder, PaymentError, PaymentGateway};

const DEFAULT_BASE_URL: &str = "https://api.razorpay.com/v1";

#[derive(Debug, Clone)]
pub struct RazorpayGateway {
    http: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

#[derive(Serialize)]
struct CreateOrderBody<'a> {
    amount: u64,
    currency: &'a str,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    description: String,
}

impl RazorpayGateway {
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, key_id, key_secret)
    }

    /// Points the client at another API root, e.g. a local mock.
    pub fn with_base_url(
        base_url: impl Into<String>,
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            key_id: key_id.into(),
            key_secret: key_secret.into(),
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(
        &self,
        amount_minor: u64,
        currency: &str,
    ) -> Result<GatewayOrder, PaymentError> {
        let response = self
            .http
            .post(format!("{}/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&CreateOrderBody {
                amount: amount_minor,
                currency,
            })
            .send()
            .await
            .map_err(|err| PaymentError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let description = response
                .json::<ErrorEnvelope>()
                .await
                .map(|envelope| envelope.error.description)
                .unwrap_or_default();
            warn!(%status, %description, "gateway rejected order");

            let message = if description.is_empty() {
                format!("Failed to create order ({status})")
            } else {
                description
            };
            return Err(PaymentError::Rejected(message));
        }

        let order: GatewayOrder = response
            .json()
            .await
            .map_err(|err| PaymentError::Transport(err.to_string()))?;

        info!(order_id = %order.id, amount = order.amount, "gateway order created");
        Ok(order)
    }

    fn key_id(&self) -> &str {
        &self.key_id
    }
}
