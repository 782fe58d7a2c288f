use std::collections::HashMap;

use async_trait::async_trait;

use super::model::{Booking, BookingSummary, Ticket};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReserveOutcome {
    Reserved,
    Insufficient { available: i64 },
    SeminarNotFound,
}

/// Gateway details stored on a booking once its payment is verified.
#[derive(Debug, Clone)]
pub struct PaymentConfirmation {
    pub payment_id: String,
    pub order_id: String,
    pub method: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ConfirmOutcome {
    Confirmed(Booking, Vec<Ticket>),
    AlreadyPaid(Booking, Vec<Ticket>),
    /// Seats ran out before this payment landed; the booking is now CANCELLED.
    SoldOut { available: i64 },
    Cancelled,
    NotFound,
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts `booking` as PENDING only if its quantity still fits within
    /// the seminar capacity minus the PAID seats, as one atomic step.
    async fn reserve(&self, booking: &Booking) -> Result<ReserveOutcome>;

    async fn set_order_id(&self, booking_id: &str, order_id: &str) -> Result<()>;

    /// Rechecks capacity, marks the booking PAID and stores `tickets`, atomically.
    async fn confirm_payment(
        &self,
        booking_id: &str,
        payment: &PaymentConfirmation,
        tickets: &[Ticket],
    ) -> Result<ConfirmOutcome>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>>;
    async fn tickets_for(&self, booking_id: &str) -> Result<Vec<Ticket>>;

    async fn paid_seats(&self, seminar_id: &str) -> Result<i64>;

    /// PAID seats per seminar id; seminars without paid bookings are absent.
    async fn paid_seat_totals(&self) -> Result<HashMap<String, i64>>;

    async fn count_for_seminar(&self, seminar_id: &str) -> Result<i64>;

    /// Newest first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<BookingSummary>>;

    /// Newest first.
    async fn list_all(&self) -> Result<Vec<BookingSummary>>;
}
