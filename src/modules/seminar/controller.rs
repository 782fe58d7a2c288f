use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::model::Seminar;
use super::schema::{SeminarRequest, SeminarResponse};
use crate::error::{AppError, Result};
use crate::response::{ApiResponse, ApiResult};
use crate::AppState;

/// Largest price a `DECIMAL(10,2)` column holds.
fn max_price() -> Decimal {
    Decimal::new(9_999_999_999, 2)
}

fn check_request(req: &SeminarRequest) -> Result<()> {
    req.validate()?;
    if req.price < Decimal::ZERO {
        return Err(AppError::Validation("Price cannot be negative".to_string()));
    }
    if req.price.normalize().scale() > 2 || req.price > max_price() {
        return Err(AppError::Validation(
            "Price must have at most 2 decimal places and not exceed 99999999.99".to_string(),
        ));
    }
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    Ok(())
}

async fn with_availability(state: &AppState, seminar: Seminar) -> Result<SeminarResponse> {
    let booked = state.repos.bookings.paid_seats(&seminar.id).await?;
    Ok(SeminarResponse::new(seminar, booked))
}

// =============================================================================
// GET /api/seminars
// =============================================================================

pub async fn list_seminars(State(state): State<Arc<AppState>>) -> ApiResult<Vec<SeminarResponse>> {
    let seminars = state.repos.seminars.list().await?;
    let booked = state.repos.bookings.paid_seat_totals().await?;

    let data = seminars
        .into_iter()
        .map(|s| {
            let seats = booked.get(&s.id).copied().unwrap_or(0);
            SeminarResponse::new(s, seats)
        })
        .collect();

    Ok(ApiResponse::ok("Seminars", data))
}

// =============================================================================
// GET /api/seminars/{id}
// =============================================================================

pub async fn get_seminar(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<SeminarResponse> {
    let seminar = state
        .repos
        .seminars
        .find_by_id(&id)
        .await?
        .ok_or(AppError::NotFound("Seminar"))?;

    Ok(ApiResponse::ok("Seminar", with_availability(&state, seminar).await?))
}

// =============================================================================
// POST /api/admin/seminars
// =============================================================================

pub async fn create_seminar(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SeminarRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SeminarResponse>>)> {
    check_request(&req)?;

    let now = Utc::now();
    let seminar = Seminar {
        id: Uuid::new_v4().to_string(),
        title: req.title.trim().to_string(),
        description: req.description,
        date: req.date,
        time: req.time,
        duration_minutes: req.duration_minutes,
        location: req.location.trim().to_string(),
        price: req.price,
        capacity: req.capacity,
        status: req.status,
        image_url: req.image_url,
        created_at: now,
        updated_at: now,
    };

    state.repos.seminars.create(&seminar).await?;
    tracing::info!(seminar_id = %seminar.id, title = %seminar.title, "seminar created");

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("Seminar created", SeminarResponse::new(seminar, 0)),
    ))
}

// =============================================================================
// PUT /api/admin/seminars/{id}
// =============================================================================

pub async fn update_seminar(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<SeminarRequest>,
) -> ApiResult<SeminarResponse> {
    check_request(&req)?;

    let existing = state
        .repos
        .seminars
        .find_by_id(&id)
        .await?
        .ok_or(AppError::NotFound("Seminar"))?;

    let seminar = Seminar {
        title: req.title.trim().to_string(),
        description: req.description,
        date: req.date,
        time: req.time,
        duration_minutes: req.duration_minutes,
        location: req.location.trim().to_string(),
        price: req.price,
        capacity: req.capacity,
        status: req.status,
        image_url: req.image_url,
        updated_at: Utc::now(),
        ..existing
    };

    state.repos.seminars.update(&seminar).await?;
    tracing::info!(seminar_id = %seminar.id, "seminar updated");

    Ok(ApiResponse::ok("Seminar updated", with_availability(&state, seminar).await?))
}

// =============================================================================
// DELETE /api/admin/seminars/{id}
// =============================================================================

pub async fn delete_seminar(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    if state.repos.bookings.count_for_seminar(&id).await? > 0 {
        return Err(AppError::Conflict(
            "Seminar has bookings and cannot be deleted".to_string(),
        ));
    }

    if !state.repos.seminars.delete(&id).await? {
        return Err(AppError::NotFound("Seminar"));
    }
    tracing::info!(seminar_id = %id, "seminar deleted");

    Ok(ApiResponse::message("Seminar deleted"))
}
