use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySql, Pool};

use super::interface::{BookingRepository, ConfirmOutcome, PaymentConfirmation, ReserveOutcome};
use super::model::{Booking, BookingStatus, BookingSummary, Ticket};
use crate::error::{conflict_on_duplicate, Result};

const SUMMARY_SELECT: &str = r#"
    SELECT b.*, s.title AS seminar_title, u.username
    FROM bookings b
    JOIN seminars s ON s.id = b.seminar_id
    JOIN users u ON u.id = b.user_id
"#;

pub struct BookingCrud {
    pool: Pool<MySql>,
}

impl BookingCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

async fn paid_seats_with<'e, E>(executor: E, seminar_id: &str) -> Result<i64>
where
    E: sqlx::Executor<'e, Database = MySql>,
{
    let seats: i64 = sqlx::query_scalar(
        "SELECT CAST(COALESCE(SUM(quantity), 0) AS SIGNED) FROM bookings WHERE seminar_id = ? AND status = 'PAID'",
    )
    .bind(seminar_id)
    .fetch_one(executor)
    .await?;
    Ok(seats)
}

async fn tickets_with<'e, E>(executor: E, booking_id: &str) -> Result<Vec<Ticket>>
where
    E: sqlx::Executor<'e, Database = MySql>,
{
    let tickets = sqlx::query_as::<_, Ticket>(
        "SELECT * FROM tickets WHERE booking_id = ? ORDER BY created_at, code",
    )
    .bind(booking_id)
    .fetch_all(executor)
    .await?;
    Ok(tickets)
}

#[async_trait]
impl BookingRepository for BookingCrud {
    async fn reserve(&self, booking: &Booking) -> Result<ReserveOutcome> {
        let mut tx = self.pool.begin().await?;

        let capacity: Option<i32> =
            sqlx::query_scalar("SELECT capacity FROM seminars WHERE id = ? FOR UPDATE")
                .bind(&booking.seminar_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(capacity) = capacity else {
            return Ok(ReserveOutcome::SeminarNotFound);
        };

        let booked = paid_seats_with(&mut *tx, &booking.seminar_id).await?;
        let available = (i64::from(capacity) - booked).max(0);
        if i64::from(booking.quantity) > available {
            return Ok(ReserveOutcome::Insufficient { available });
        }

        sqlx::query(
            r#"
            INSERT INTO bookings (id, user_id, seminar_id, quantity, total_price, status,
                                  order_id, payment_id, payment_method, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&booking.id)
        .bind(&booking.user_id)
        .bind(&booking.seminar_id)
        .bind(booking.quantity)
        .bind(booking.total_price)
        .bind(booking.status.as_str())
        .bind(&booking.order_id)
        .bind(&booking.payment_id)
        .bind(&booking.payment_method)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(ReserveOutcome::Reserved)
    }

    async fn set_order_id(&self, booking_id: &str, order_id: &str) -> Result<()> {
        sqlx::query("UPDATE bookings SET order_id = ?, updated_at = ? WHERE id = ?")
            .bind(order_id)
            .bind(Utc::now())
            .bind(booking_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn confirm_payment(
        &self,
        booking_id: &str,
        payment: &PaymentConfirmation,
        tickets: &[Ticket],
    ) -> Result<ConfirmOutcome> {
        let mut tx = self.pool.begin().await?;

        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ? FOR UPDATE")
            .bind(booking_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(mut booking) = booking else {
            return Ok(ConfirmOutcome::NotFound);
        };

        match booking.status {
            BookingStatus::Paid => {
                let existing = tickets_with(&mut *tx, booking_id).await?;
                return Ok(ConfirmOutcome::AlreadyPaid(booking, existing));
            }
            BookingStatus::Cancelled => return Ok(ConfirmOutcome::Cancelled),
            BookingStatus::Pending => {}
        }

        let capacity: Option<i32> =
            sqlx::query_scalar("SELECT capacity FROM seminars WHERE id = ? FOR UPDATE")
                .bind(&booking.seminar_id)
                .fetch_optional(&mut *tx)
                .await?;
        let booked = paid_seats_with(&mut *tx, &booking.seminar_id).await?;
        let available = (i64::from(capacity.unwrap_or(0)) - booked).max(0);
        let now = Utc::now();

        if i64::from(booking.quantity) > available {
            sqlx::query("UPDATE bookings SET status = ?, updated_at = ? WHERE id = ?")
                .bind(BookingStatus::Cancelled.as_str())
                .bind(now)
                .bind(booking_id)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            return Ok(ConfirmOutcome::SoldOut { available });
        }

        sqlx::query(
            r#"
            UPDATE bookings
            SET status = ?, payment_id = ?, order_id = ?, payment_method = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(BookingStatus::Paid.as_str())
        .bind(&payment.payment_id)
        .bind(&payment.order_id)
        .bind(&payment.method)
        .bind(now)
        .bind(booking_id)
        .execute(&mut *tx)
        .await?;

        for ticket in tickets {
            sqlx::query("INSERT INTO tickets (id, booking_id, code, created_at) VALUES (?, ?, ?, ?)")
                .bind(&ticket.id)
                .bind(&ticket.booking_id)
                .bind(&ticket.code)
                .bind(ticket.created_at)
                .execute(&mut *tx)
                .await
                .map_err(|e| conflict_on_duplicate(e, "Ticket code collision, please retry"))?;
        }

        tx.commit().await?;

        booking.status = BookingStatus::Paid;
        booking.payment_id = Some(payment.payment_id.clone());
        booking.order_id = Some(payment.order_id.clone());
        booking.payment_method = payment.method.clone();
        booking.updated_at = now;

        Ok(ConfirmOutcome::Confirmed(booking, tickets.to_vec()))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(booking)
    }

    async fn tickets_for(&self, booking_id: &str) -> Result<Vec<Ticket>> {
        tickets_with(&self.pool, booking_id).await
    }

    async fn paid_seats(&self, seminar_id: &str) -> Result<i64> {
        paid_seats_with(&self.pool, seminar_id).await
    }

    async fn paid_seat_totals(&self) -> Result<HashMap<String, i64>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT seminar_id, CAST(SUM(quantity) AS SIGNED)
            FROM bookings
            WHERE status = 'PAID'
            GROUP BY seminar_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().collect())
    }

    async fn count_for_seminar(&self, seminar_id: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE seminar_id = ?")
            .bind(seminar_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<BookingSummary>> {
        let sql = format!("{} WHERE b.user_id = ? ORDER BY b.created_at DESC", SUMMARY_SELECT);
        let bookings = sqlx::query_as::<_, BookingSummary>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(bookings)
    }

    async fn list_all(&self) -> Result<Vec<BookingSummary>> {
        let sql = format!("{} ORDER BY b.created_at DESC", SUMMARY_SELECT);
        let bookings = sqlx::query_as::<_, BookingSummary>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(bookings)
    }
}
