use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::model::{Inquiry, InquiryStatus, InquiryType};
use super::schema::{CreateInquiryRequest, UpdateInquiryStatusRequest};
use crate::error::{AppError, Result};
use crate::modules::auth::schema::normalize_phone;
use crate::response::{ApiResponse, ApiResult};
use crate::AppState;

// =============================================================================
// POST /api/inquiries
// =============================================================================

pub async fn create_inquiry(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateInquiryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Inquiry>>)> {
    req.validate()?;

    let inquiry_type: InquiryType = req
        .inquiry_type
        .trim()
        .parse()
        .map_err(|_| AppError::Validation("Invalid inquiry type".to_string()))?;

    let now = Utc::now();
    let inquiry = Inquiry {
        id: Uuid::new_v4().to_string(),
        name: req.name.trim().to_string(),
        email: req.email.trim().to_lowercase(),
        phone: req.phone.as_deref().map(normalize_phone),
        inquiry_type,
        subject: req.subject.trim().to_string(),
        message: req.message.trim().to_string(),
        status: InquiryStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    state.repos.inquiries.create(&inquiry).await?;
    tracing::info!(inquiry_id = %inquiry.id, inquiry_type = %inquiry.inquiry_type, "inquiry received");

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("Inquiry submitted", inquiry),
    ))
}

// =============================================================================
// GET /api/admin/inquiries
// =============================================================================

pub async fn list_inquiries(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Inquiry>> {
    let inquiries = state.repos.inquiries.list().await?;
    Ok(ApiResponse::ok("Inquiries", inquiries))
}

// =============================================================================
// PATCH /api/admin/inquiries/{id}/status
// =============================================================================

pub async fn update_inquiry_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateInquiryStatusRequest>,
) -> ApiResult<Inquiry> {
    let status: InquiryStatus = req.status.parse().map_err(|_| {
        AppError::Validation("Status must be one of PENDING, IN_PROGRESS, RESOLVED".to_string())
    })?;

    let mut inquiry = state
        .repos
        .inquiries
        .find_by_id(&id)
        .await?
        .ok_or(AppError::NotFound("Inquiry"))?;

    state.repos.inquiries.update_status(&id, status).await?;
    inquiry.status = status;
    inquiry.updated_at = Utc::now();
    tracing::info!(inquiry_id = %id, status = %status, "inquiry status updated");

    Ok(ApiResponse::ok("Inquiry updated", inquiry))
}
