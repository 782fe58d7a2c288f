use axum::{extract::State, Json};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::completion::calculate_completion;
use super::model::{Child, Profile};
use super::schema::{ProfileResponse, UpdateProfileRequest};
use crate::error::{AppError, Result};
use crate::response::{ApiResponse, ApiResult};
use crate::services::guard::CurrentUser;
use crate::AppState;

const MAX_CHILDREN: usize = 10;

async fn load_profile(state: &AppState, user_id: &str) -> Result<ProfileResponse> {
    let profile = state.repos.profiles.find_profile(user_id).await?;
    let children = state.repos.profiles.find_children(user_id).await?;

    let details = profile.map(|p| p.details);
    let completion = calculate_completion(details.as_ref(), &children);

    Ok(ProfileResponse {
        profile: details,
        children: children.into_iter().map(Into::into).collect(),
        completion,
    })
}

// =============================================================================
// GET /api/user/profile
// =============================================================================

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<ProfileResponse> {
    let response = load_profile(&state, &current.sub).await?;
    Ok(ApiResponse::ok("Profile", response))
}

// =============================================================================
// PUT /api/user/profile
// =============================================================================

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<ProfileResponse> {
    let req = UpdateProfileRequest {
        details: req.details.normalized(),
        children: req.children,
    };
    req.validate()?;

    if req.children.len() > MAX_CHILDREN {
        return Err(AppError::Validation(format!(
            "At most {} children can be added",
            MAX_CHILDREN
        )));
    }

    let now = Utc::now();
    let profile = Profile {
        user_id: current.sub.clone(),
        details: req.details,
        updated_at: now,
    };

    let children: Vec<Child> = req
        .children
        .into_iter()
        .map(|c| Child {
            id: Uuid::new_v4().to_string(),
            user_id: current.sub.clone(),
            name: c.name.trim().to_string(),
            age: c.age,
            gender: c.gender.map(|g| g.trim().to_string()).filter(|g| !g.is_empty()),
            class_name: c
                .class_name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            created_at: now,
        })
        .collect();

    state.repos.profiles.save(&profile, &children).await?;

    let response = load_profile(&state, &current.sub).await?;
    tracing::info!(
        user_id = %current.sub,
        completion = response.completion.percentage,
        "profile updated"
    );

    Ok(ApiResponse::ok("Profile updated", response))
}
