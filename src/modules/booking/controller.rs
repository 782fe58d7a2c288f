use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

use super::schema::{BookingResponse, CreateBookingRequest, CreateBookingResponse, VerifyPaymentRequest};
use super::service;
use crate::error::Result;
use crate::response::{ApiResponse, ApiResult};
use crate::services::guard::CurrentUser;
use crate::AppState;

// =============================================================================
// POST /api/user/bookings
// =============================================================================

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreateBookingResponse>>)> {
    req.validate()?;

    let order = service::reserve_and_open_order(
        &state,
        &current.sub,
        req.seminar_id.trim(),
        req.quantity,
    )
    .await?;

    Ok((StatusCode::CREATED, ApiResponse::ok("Booking created", order)))
}

// =============================================================================
// POST /api/user/bookings/verify
// =============================================================================

pub async fn verify_payment(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(req): Json<VerifyPaymentRequest>,
) -> ApiResult<BookingResponse> {
    let req = req.trimmed();
    req.validate()?;

    let (booking, tickets) = service::verify_and_issue(&state, &current.sub, &req).await?;

    Ok(ApiResponse::ok(
        "Payment verified",
        BookingResponse::new(booking, tickets),
    ))
}

// =============================================================================
// GET /api/user/bookings
// =============================================================================

pub async fn my_bookings(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Vec<BookingResponse>> {
    let summaries = state.repos.bookings.list_for_user(&current.sub).await?;

    let mut bookings = Vec::with_capacity(summaries.len());
    for summary in summaries {
        let tickets = state.repos.bookings.tickets_for(&summary.booking.id).await?;
        bookings.push(BookingResponse::from_summary(summary, tickets));
    }

    Ok(ApiResponse::ok("Bookings", bookings))
}
