use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Amount cannot be represented in minor units: {0}")]
    InvalidAmount(Decimal),
}

/// Order creation payload; `amount` is in the currency's minor unit (paise).
#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
}

/// External payment processor.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, request: &OrderRequest) -> Result<GatewayOrder, PaymentError>;

    /// Method used for a captured payment (`card`, `upi`, ...), if reported.
    async fn fetch_payment_method(&self, payment_id: &str) -> Result<Option<String>, PaymentError>;
}

/// Converts a major-unit amount to minor units (x100) without going through floats.
pub fn to_minor_units(amount: Decimal) -> Result<i64, PaymentError> {
    let minor = amount * Decimal::ONE_HUNDRED;
    if minor.fract() != Decimal::ZERO {
        return Err(PaymentError::InvalidAmount(amount));
    }
    minor.to_i64().ok_or(PaymentError::InvalidAmount(amount))
}
