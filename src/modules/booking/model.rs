use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Pending,
    Paid,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "PAID" => Ok(Self::Paid),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(format!("unknown booking status: {}", other)),
        }
    }
}

impl TryFrom<String> for BookingStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub seminar_id: String,
    pub quantity: i32,
    pub total_price: Decimal,
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    pub payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Booking joined with the names the listings display.
#[derive(Debug, Clone, FromRow)]
pub struct BookingSummary {
    #[sqlx(flatten)]
    pub booking: Booking,
    pub seminar_title: String,
    pub username: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct Ticket {
    pub id: String,
    pub booking_id: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
}
