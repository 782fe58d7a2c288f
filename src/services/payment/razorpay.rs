use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::gateway::{GatewayOrder, OrderRequest, PaymentError, PaymentGateway};

/// Razorpay REST client
/// Authenticates every call with the key id/secret pair over basic auth
pub struct RazorpayClient {
    client: Client,
    key_id: String,
    key_secret: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct RazorpayPayment {
    method: Option<String>,
}

impl RazorpayClient {
    pub fn new(key_id: String, key_secret: String) -> Self {
        Self::with_base_url(key_id, key_secret, "https://api.razorpay.com/v1".to_string())
    }

    pub fn with_base_url(key_id: String, key_secret: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            key_id,
            key_secret,
            base_url,
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    async fn create_order(&self, request: &OrderRequest) -> Result<GatewayOrder, PaymentError> {
        let url = format!("{}/orders", self.base_url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(request)
            .send()
            .await
            .map_err(|e| PaymentError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Api(format!(
                "order creation returned status {}: {}",
                status, body
            )));
        }

        response
            .json::<GatewayOrder>()
            .await
            .map_err(|e| PaymentError::Parse(e.to_string()))
    }

    async fn fetch_payment_method(&self, payment_id: &str) -> Result<Option<String>, PaymentError> {
        let url = format!("{}/payments/{}", self.base_url, payment_id);

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await
            .map_err(|e| PaymentError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PaymentError::Api(format!(
                "payment fetch returned status: {}",
                response.status()
            )));
        }

        let payment: RazorpayPayment = response
            .json()
            .await
            .map_err(|e| PaymentError::Parse(e.to_string()))?;

        Ok(payment.method)
    }
}
