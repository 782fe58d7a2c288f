use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::error::Result;
use crate::modules::auth::schema::UserResponse;
use crate::modules::booking::schema::BookingResponse;
use crate::response::{ApiResponse, ApiResult};
use crate::services::export::{attachment, to_csv};
use crate::AppState;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn csv_download(filename: &str, body: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, attachment(filename)),
        ],
        body,
    )
        .into_response()
}

// =============================================================================
// GET /api/admin/users
// =============================================================================

pub async fn list_users(State(state): State<Arc<AppState>>) -> ApiResult<Vec<UserResponse>> {
    let users = state.repos.users.list().await?;
    Ok(ApiResponse::ok(
        "Users",
        users.into_iter().map(Into::into).collect(),
    ))
}

// =============================================================================
// GET /api/admin/bookings
// =============================================================================

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Vec<BookingResponse>> {
    let summaries = state.repos.bookings.list_all().await?;

    let mut bookings = Vec::with_capacity(summaries.len());
    for summary in summaries {
        let tickets = state.repos.bookings.tickets_for(&summary.booking.id).await?;
        bookings.push(BookingResponse::from_summary(summary, tickets));
    }

    Ok(ApiResponse::ok("Bookings", bookings))
}

// =============================================================================
// GET /api/admin/export/{users,bookings,inquiries}
// =============================================================================

pub async fn export_users(State(state): State<Arc<AppState>>) -> Result<Response> {
    let users = state.repos.users.list().await?;

    let rows = users.into_iter().map(|u| {
        vec![
            u.id,
            u.username,
            u.phone,
            u.email.unwrap_or_default(),
            u.role.to_string(),
            u.is_verified.to_string(),
            u.created_at.format(TIMESTAMP_FORMAT).to_string(),
        ]
    });
    let body = to_csv(
        &["id", "username", "phone", "email", "role", "verified", "created_at"],
        rows,
    );

    tracing::info!("users exported");
    Ok(csv_download("users.csv", body))
}

pub async fn export_bookings(State(state): State<Arc<AppState>>) -> Result<Response> {
    let summaries = state.repos.bookings.list_all().await?;

    let rows = summaries.into_iter().map(|s| {
        let b = s.booking;
        vec![
            b.id,
            s.seminar_title,
            s.username,
            b.quantity.to_string(),
            b.total_price.to_string(),
            b.status.to_string(),
            b.order_id.unwrap_or_default(),
            b.payment_id.unwrap_or_default(),
            b.payment_method.unwrap_or_default(),
            b.created_at.format(TIMESTAMP_FORMAT).to_string(),
        ]
    });
    let body = to_csv(
        &[
            "id",
            "seminar",
            "username",
            "quantity",
            "total_price",
            "status",
            "order_id",
            "payment_id",
            "payment_method",
            "created_at",
        ],
        rows,
    );

    tracing::info!("bookings exported");
    Ok(csv_download("bookings.csv", body))
}

pub async fn export_inquiries(State(state): State<Arc<AppState>>) -> Result<Response> {
    let inquiries = state.repos.inquiries.list().await?;

    let rows = inquiries.into_iter().map(|i| {
        vec![
            i.id,
            i.name,
            i.email,
            i.phone.unwrap_or_default(),
            i.inquiry_type.to_string(),
            i.subject,
            i.message,
            i.status.to_string(),
            i.created_at.format(TIMESTAMP_FORMAT).to_string(),
        ]
    });
    let body = to_csv(
        &[
            "id",
            "name",
            "email",
            "phone",
            "type",
            "subject",
            "message",
            "status",
            "created_at",
        ],
        rows,
    );

    tracing::info!("inquiries exported");
    Ok(csv_download("inquiries.csv", body))
}
