use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::interface::{ConfirmOutcome, PaymentConfirmation, ReserveOutcome};
use super::model::{Booking, BookingStatus, Ticket};
use super::schema::{CreateBookingResponse, VerifyPaymentRequest};
use crate::error::{AppError, Result};
use crate::services::payment::{gateway::to_minor_units, verify_payment_signature, OrderRequest};
use crate::services::tickets::generate_ticket_codes;
use crate::AppState;

/// Receipt sent to the gateway; it only accepts short alphanumeric receipts.
fn receipt_for(booking_id: &str) -> String {
    format!("bk_{}", booking_id.replace('-', ""))
}

/// Reserves seats and opens a gateway order for them.
///
/// The booking stays PENDING (without an order id when the gateway fails)
/// until a verified payment confirms it.
pub async fn reserve_and_open_order(
    state: &AppState,
    user_id: &str,
    seminar_id: &str,
    quantity: i32,
) -> Result<CreateBookingResponse> {
    let seminar = state
        .repos
        .seminars
        .find_by_id(seminar_id)
        .await?
        .ok_or(AppError::NotFound("Seminar"))?;

    let total_price = seminar.price * Decimal::from(quantity);
    let amount =
        to_minor_units(total_price).map_err(|e| AppError::PaymentGateway(e.to_string()))?;

    let now = Utc::now();
    let booking = Booking {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        seminar_id: seminar.id.clone(),
        quantity,
        total_price,
        status: BookingStatus::Pending,
        order_id: None,
        payment_id: None,
        payment_method: None,
        created_at: now,
        updated_at: now,
    };

    match state.repos.bookings.reserve(&booking).await? {
        ReserveOutcome::Reserved => {}
        ReserveOutcome::Insufficient { available } => {
            state.metrics.record_booking("insufficient_seats");
            return Err(AppError::InsufficientSeats { available });
        }
        ReserveOutcome::SeminarNotFound => return Err(AppError::NotFound("Seminar")),
    }

    let order = state
        .payments
        .create_order(&OrderRequest {
            amount,
            currency: state.settings.payment_currency.clone(),
            receipt: receipt_for(&booking.id),
        })
        .await
        .map_err(|e| {
            state.metrics.record_booking("gateway_error");
            tracing::error!(booking_id = %booking.id, error = %e, "failed to open payment order");
            AppError::PaymentGateway(e.to_string())
        })?;

    state.repos.bookings.set_order_id(&booking.id, &order.id).await?;
    state.metrics.record_booking("reserved");
    tracing::info!(
        booking_id = %booking.id,
        seminar_id = %seminar.id,
        user_id,
        quantity,
        order_id = %order.id,
        "booking reserved"
    );

    Ok(CreateBookingResponse {
        booking_id: booking.id,
        order_id: order.id,
        amount: order.amount,
        currency: order.currency,
        total_price,
        key_id: state.settings.payment_key_id.clone(),
    })
}

/// Checks the gateway callback and, on success, marks the booking PAID and
/// issues one ticket per seat. Re-verifying a PAID booking returns its
/// existing tickets.
pub async fn verify_and_issue(
    state: &AppState,
    user_id: &str,
    req: &VerifyPaymentRequest,
) -> Result<(Booking, Vec<Ticket>)> {
    if !verify_payment_signature(
        &state.settings.payment_key_secret,
        &req.order_id,
        &req.payment_id,
        &req.signature,
    ) {
        state.metrics.record_payment("invalid_signature");
        tracing::warn!(booking_id = %req.booking_id, user_id, "payment signature mismatch");
        return Err(AppError::InvalidSignature);
    }

    let booking = state
        .repos
        .bookings
        .find_by_id(&req.booking_id)
        .await?
        .filter(|b| b.user_id == user_id)
        .ok_or(AppError::NotFound("Booking"))?;

    if booking.order_id.as_deref() != Some(req.order_id.as_str()) {
        state.metrics.record_payment("order_mismatch");
        return Err(AppError::Validation(
            "Order does not match this booking".to_string(),
        ));
    }

    let method = match state.payments.fetch_payment_method(&req.payment_id).await {
        Ok(method) => method,
        Err(e) => {
            tracing::warn!(payment_id = %req.payment_id, error = %e, "could not fetch payment method");
            None
        }
    };

    let now = Utc::now();
    let tickets: Vec<Ticket> = generate_ticket_codes(booking.quantity.max(0) as usize)
        .into_iter()
        .map(|code| Ticket {
            id: Uuid::new_v4().to_string(),
            booking_id: booking.id.clone(),
            code,
            created_at: now,
        })
        .collect();

    let payment = PaymentConfirmation {
        payment_id: req.payment_id.clone(),
        order_id: req.order_id.clone(),
        method,
    };

    match state
        .repos
        .bookings
        .confirm_payment(&booking.id, &payment, &tickets)
        .await?
    {
        ConfirmOutcome::Confirmed(booking, tickets) => {
            state.metrics.record_payment("verified");
            state.metrics.tickets_issued_total.inc_by(tickets.len() as u64);
            tracing::info!(
                booking_id = %booking.id,
                payment_id = %payment.payment_id,
                tickets = tickets.len(),
                "payment verified"
            );
            Ok((booking, tickets))
        }
        ConfirmOutcome::AlreadyPaid(booking, tickets) => {
            state.metrics.record_payment("already_paid");
            Ok((booking, tickets))
        }
        ConfirmOutcome::SoldOut { available } => {
            state.metrics.record_payment("sold_out");
            tracing::warn!(
                booking_id = %booking.id,
                payment_id = %payment.payment_id,
                available,
                "seats ran out before payment was confirmed, booking cancelled"
            );
            Err(AppError::Conflict(format!(
                "Seats sold out before payment was confirmed, only {} seats available",
                available
            )))
        }
        ConfirmOutcome::Cancelled => Err(AppError::Conflict(
            "Booking has been cancelled".to_string(),
        )),
        ConfirmOutcome::NotFound => Err(AppError::NotFound("Booking")),
    }
}
