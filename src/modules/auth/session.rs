use chrono::Utc;
use tower_cookies::Cookies;
use uuid::Uuid;

use super::model::{RefreshToken, Role, User};
use crate::error::{AppError, Result};
use crate::services::cookies::set_auth_cookies;
use crate::services::hashing;
use crate::AppState;

fn token_error(e: jsonwebtoken::errors::Error) -> AppError {
    AppError::Internal(format!("token signing failed: {}", e))
}

/// Issues a fresh access/refresh pair for `user`, persists the refresh
/// token (as a child of `parent` when rotating) and sets both cookies.
///
/// Returns `false`, leaving the cookies alone, when `parent` was rotated
/// by someone else first.
async fn issue_pair(
    state: &AppState,
    user: &User,
    cookies: &Cookies,
    parent: Option<&RefreshToken>,
) -> Result<bool> {
    let jwt = &state.jwt_service;
    let access_token = jwt.issue_access_token(user).map_err(token_error)?;
    let refresh_token = jwt.issue_refresh_token(&user.id).map_err(token_error)?;

    let now = Utc::now();
    let record = RefreshToken {
        id: Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        token: refresh_token.clone(),
        expires_at: now + jwt.refresh_token_duration(),
        revoked: false,
        parent_token_id: parent.map(|p| p.id.clone()),
        replaced_by_id: None,
        created_at: now,
    };

    let stored = match parent {
        Some(old) => state.repos.refresh_tokens.rotate(&old.id, &record).await?,
        None => {
            state.repos.refresh_tokens.create(&record).await?;
            true
        }
    };
    if !stored {
        return Ok(false);
    }

    set_auth_cookies(
        cookies,
        access_token,
        refresh_token,
        jwt.access_token_duration(),
        jwt.refresh_token_duration(),
        state.settings.cookie_secure,
    );

    Ok(true)
}

pub async fn start_session(state: &AppState, user: &User, cookies: &Cookies) -> Result<()> {
    issue_pair(state, user, cookies, None).await.map(|_| ())
}

/// Revokes every refresh token of `user_id` and refuses the request.
async fn fail_closed<T>(state: &AppState, user_id: &str) -> Result<T> {
    let revoked = state.repos.refresh_tokens.revoke_all_for_user(user_id).await?;
    state.metrics.record_refresh("reuse_detected");
    tracing::warn!(
        user_id = %user_id,
        revoked,
        "refresh token reuse detected, revoked all sessions"
    );
    Err(AppError::Forbidden(
        "Session is no longer valid, please sign in again".to_string(),
    ))
}

/// Rotates a presented refresh token.
///
/// A token that verifies but has no live stored record (unknown, revoked or
/// expired), or that loses a concurrent rotation, is treated as stolen:
/// every refresh token of its owner is revoked.
pub async fn rotate_session(state: &AppState, presented: &str, cookies: &Cookies) -> Result<User> {
    let claims = state
        .jwt_service
        .verify_refresh_token(presented)
        .ok_or_else(|| AppError::Unauthorized("Invalid refresh token".to_string()))?;

    let now = Utc::now();
    let record = state.repos.refresh_tokens.find_by_token(presented).await?;

    let record = match record {
        Some(r) if !r.revoked && !r.is_expired(now) && r.user_id == claims.sub => r,
        _ => return fail_closed(state, &claims.sub).await,
    };

    let user = state
        .repos
        .users
        .find_by_id(&record.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;

    if !issue_pair(state, &user, cookies, Some(&record)).await? {
        return fail_closed(state, &user.id).await;
    }
    state.metrics.record_refresh("rotated");
    tracing::debug!(user_id = %user.id, "refresh token rotated");

    Ok(user)
}

/// Resolves `identifier` (phone or username) and checks the password and role.
pub async fn authenticate(
    state: &AppState,
    identifier: &str,
    password: &str,
    expected_role: Role,
) -> Result<User> {
    let identifier = identifier.trim();
    let users = &state.repos.users;

    let mut user = None;
    if super::schema::PHONE_RE.is_match(identifier) {
        user = users
            .find_by_phone(&super::schema::normalize_phone(identifier))
            .await?;
    }
    if user.is_none() {
        user = users.find_by_username(identifier).await?;
    }

    let invalid = || AppError::Unauthorized("Invalid credentials".to_string());
    let user = user.ok_or_else(invalid)?;

    let valid = hashing::verify_password(password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !valid || user.role != expected_role {
        return Err(invalid());
    }

    if !user.is_verified {
        return Err(AppError::Forbidden(
            "Please verify your phone number before signing in".to_string(),
        ));
    }

    Ok(user)
}
