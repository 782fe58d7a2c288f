use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::model::{Booking, BookingStatus, BookingSummary, Ticket};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    #[validate(length(min = 1, message = "Seminar is required"))]
    pub seminar_id: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

/// What the client needs to open the gateway checkout.
#[derive(Debug, Serialize)]
pub struct CreateBookingResponse {
    pub booking_id: String,
    pub order_id: String,
    /// Minor currency units.
    pub amount: i64,
    pub currency: String,
    pub total_price: Decimal,
    pub key_id: String,
}

/// Gateway callback fields. Missing fields deserialize as blank so they
/// are reported as validation errors.
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyPaymentRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Booking id is required"))]
    pub booking_id: String,
    #[serde(default, alias = "razorpay_payment_id")]
    #[validate(length(min = 1, message = "Payment id is required"))]
    pub payment_id: String,
    #[serde(default, alias = "razorpay_order_id")]
    #[validate(length(min = 1, message = "Order id is required"))]
    pub order_id: String,
    #[serde(default, alias = "razorpay_signature")]
    #[validate(length(min = 1, message = "Signature is required"))]
    pub signature: String,
}

impl VerifyPaymentRequest {
    pub fn trimmed(self) -> Self {
        Self {
            booking_id: self.booking_id.trim().to_string(),
            payment_id: self.payment_id.trim().to_string(),
            order_id: self.order_id.trim().to_string(),
            signature: self.signature.trim().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TicketResponse {
    pub code: String,
    pub created_at: DateTime<Utc>,
}

impl From<Ticket> for TicketResponse {
    fn from(ticket: Ticket) -> Self {
        Self {
            code: ticket.code,
            created_at: ticket.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: String,
    pub seminar_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seminar_title: Option<String>,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub quantity: i32,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    pub payment_method: Option<String>,
    pub tickets: Vec<TicketResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingResponse {
    pub fn new(booking: Booking, tickets: Vec<Ticket>) -> Self {
        Self {
            id: booking.id,
            seminar_id: booking.seminar_id,
            seminar_title: None,
            user_id: booking.user_id,
            username: None,
            quantity: booking.quantity,
            total_price: booking.total_price,
            status: booking.status,
            order_id: booking.order_id,
            payment_id: booking.payment_id,
            payment_method: booking.payment_method,
            tickets: tickets.into_iter().map(Into::into).collect(),
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }

    pub fn from_summary(summary: BookingSummary, tickets: Vec<Ticket>) -> Self {
        Self {
            seminar_title: Some(summary.seminar_title),
            username: Some(summary.username),
            ..Self::new(summary.booking, tickets)
        }
    }
}
