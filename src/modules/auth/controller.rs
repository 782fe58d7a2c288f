use axum::{extract::State, http::StatusCode, Json};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tower_cookies::Cookies;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::modules::auth::{
    model::{Role, User},
    schema::{
        normalize_phone, OtpSentResponse, ResendOtpRequest, SignInRequest, SignUpRequest,
        UserResponse, VerifyOtpRequest,
    },
    session,
};
use crate::response::{ApiResponse, ApiResult};
use crate::services::cookies::{clear_auth_cookies, read_cookie, REFRESH_TOKEN_COOKIE};
use crate::services::guard::CurrentUser;
use crate::services::{hashing, otp};
use crate::AppState;

fn otp_wait_message(user: &User) -> String {
    let remaining = user
        .otp_expires_at
        .map(|expires| (expires - Utc::now()).num_seconds().max(1))
        .unwrap_or(1);
    format!("OTP already sent. Please try again in {} seconds", remaining)
}

/// Generates, stores and sends a new OTP. When delivery fails the OTP is
/// cleared so the caller is not locked out until it expires.
async fn send_new_otp(state: &AppState, user: &User) -> Result<chrono::DateTime<Utc>> {
    let code = otp::generate_otp();
    let expires_at = Utc::now() + Duration::minutes(state.settings.otp_ttl_minutes);

    state
        .repos
        .users
        .set_otp(&user.id, Some(&otp::hash_otp(&code)), Some(expires_at))
        .await?;

    deliver_otp(state, user, &code).await?;
    Ok(expires_at)
}

async fn deliver_otp(state: &AppState, user: &User, code: &str) -> Result<()> {
    let body = format!(
        "{} is your Studytainment verification code. It expires in {} minutes.",
        code, state.settings.otp_ttl_minutes
    );

    if let Err(e) = state.sms.send(&user.phone, &body).await {
        tracing::error!(user_id = %user.id, error = %e, "failed to deliver OTP");
        state.repos.users.set_otp(&user.id, None, None).await?;
        return Err(AppError::Sms(e.to_string()));
    }

    Ok(())
}

// =============================================================================
// POST /api/auth/signup
// =============================================================================

pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OtpSentResponse>>)> {
    req.validate()?;

    let users = &state.repos.users;
    let username = req.username.trim().to_string();
    let phone = normalize_phone(&req.phone);

    let by_username = users.find_by_username(&username).await?;
    let by_phone = users.find_by_phone(&phone).await?;

    if by_username.as_ref().is_some_and(|u| u.is_verified) {
        return Err(AppError::Conflict("Username is already taken".to_string()));
    }
    if by_phone.as_ref().is_some_and(|u| u.is_verified) {
        return Err(AppError::Conflict("Phone number is already registered".to_string()));
    }

    let existing = match (by_username, by_phone) {
        (Some(a), Some(b)) if a.id != b.id => {
            return Err(AppError::Conflict("Username is already taken".to_string()));
        }
        (Some(a), _) => Some(a),
        (None, b) => b,
    };

    let now = Utc::now();
    if let Some(pending) = existing.as_ref().filter(|u| u.otp_pending(now)) {
        return Err(AppError::RateLimited(otp_wait_message(pending)));
    }

    let password_hash =
        hashing::hash_password(&req.password).map_err(|e| AppError::Internal(e.to_string()))?;
    let code = otp::generate_otp();
    let otp_expires_at = now + Duration::minutes(state.settings.otp_ttl_minutes);

    let user = User {
        id: existing
            .as_ref()
            .map(|u| u.id.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        username,
        phone: phone.clone(),
        email: req.email.map(|e| e.trim().to_lowercase()).filter(|e| !e.is_empty()),
        password_hash,
        role: Role::User,
        is_verified: false,
        otp_hash: Some(otp::hash_otp(&code)),
        otp_expires_at: Some(otp_expires_at),
        created_at: existing.as_ref().map(|u| u.created_at).unwrap_or(now),
        updated_at: now,
    };

    if existing.is_some() {
        users.update_registration(&user).await?;
    } else {
        users.create(&user).await?;
    }

    deliver_otp(&state, &user, &code).await?;
    tracing::info!(user_id = %user.id, "sign-up OTP sent");

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(
            "OTP sent to your phone",
            OtpSentResponse {
                phone,
                otp_expires_at,
            },
        ),
    ))
}

// =============================================================================
// POST /api/auth/verify-otp
// =============================================================================

pub async fn verify_otp(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(req): Json<VerifyOtpRequest>,
) -> ApiResult<UserResponse> {
    req.validate()?;

    let mut user = state
        .repos
        .users
        .find_by_phone(&normalize_phone(&req.phone))
        .await?
        .ok_or(AppError::NotFound("User"))?;

    if user.is_verified {
        return Err(AppError::Validation("Phone number is already verified".to_string()));
    }
    if !user.otp_pending(Utc::now()) {
        return Err(AppError::Validation("OTP has expired, please request a new one".to_string()));
    }
    let matches = user
        .otp_hash
        .as_deref()
        .is_some_and(|stored| otp::otp_matches(&req.otp, stored));
    if !matches {
        return Err(AppError::Validation("Invalid OTP".to_string()));
    }

    state.repos.users.mark_verified(&user.id).await?;
    user.is_verified = true;
    user.otp_hash = None;
    user.otp_expires_at = None;

    session::start_session(&state, &user, &cookies).await?;
    tracing::info!(user_id = %user.id, "phone verified");

    Ok(ApiResponse::ok("Phone verified", user.into()))
}

// =============================================================================
// POST /api/auth/resend-otp
// =============================================================================

pub async fn resend_otp(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResendOtpRequest>,
) -> ApiResult<OtpSentResponse> {
    req.validate()?;

    let phone = normalize_phone(&req.phone);
    let user = state
        .repos
        .users
        .find_by_phone(&phone)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    if user.is_verified {
        return Err(AppError::Validation("Phone number is already verified".to_string()));
    }
    if user.otp_pending(Utc::now()) {
        return Err(AppError::RateLimited(otp_wait_message(&user)));
    }

    let otp_expires_at = send_new_otp(&state, &user).await?;

    Ok(ApiResponse::ok(
        "OTP sent to your phone",
        OtpSentResponse {
            phone,
            otp_expires_at,
        },
    ))
}

// =============================================================================
// POST /api/auth/signin, /api/auth/admin/signin
// =============================================================================

pub async fn signin(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(req): Json<SignInRequest>,
) -> ApiResult<UserResponse> {
    sign_in_as(&state, &cookies, req, Role::User).await
}

pub async fn admin_signin(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(req): Json<SignInRequest>,
) -> ApiResult<UserResponse> {
    sign_in_as(&state, &cookies, req, Role::Admin).await
}

async fn sign_in_as(
    state: &AppState,
    cookies: &Cookies,
    req: SignInRequest,
    role: Role,
) -> ApiResult<UserResponse> {
    req.validate()?;

    let user = session::authenticate(state, &req.identifier, &req.password, role).await?;
    session::start_session(state, &user, cookies).await?;
    tracing::info!(user_id = %user.id, role = %role, "signed in");

    Ok(ApiResponse::ok("Signed in", user.into()))
}

// =============================================================================
// POST /api/auth/refresh
// =============================================================================

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> ApiResult<UserResponse> {
    let presented = read_cookie(&cookies, REFRESH_TOKEN_COOKIE)
        .ok_or_else(|| AppError::Unauthorized("Refresh token missing".to_string()))?;

    match session::rotate_session(&state, &presented, &cookies).await {
        Ok(user) => Ok(ApiResponse::ok("Session refreshed", user.into())),
        Err(e) => {
            clear_auth_cookies(&cookies, state.settings.cookie_secure);
            Err(e)
        }
    }
}

// =============================================================================
// POST /api/auth/signout
// =============================================================================

pub async fn signout(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> ApiResult<()> {
    if let Some(presented) = read_cookie(&cookies, REFRESH_TOKEN_COOKIE) {
        if let Some(record) = state.repos.refresh_tokens.find_by_token(&presented).await? {
            state.repos.refresh_tokens.revoke(&record.id).await?;
        }
    }

    clear_auth_cookies(&cookies, state.settings.cookie_secure);
    Ok(ApiResponse::message("Signed out"))
}

// =============================================================================
// GET /api/user/me
// =============================================================================

pub async fn me(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<UserResponse> {
    let user = state
        .repos
        .users
        .find_by_id(&current.sub)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    Ok(ApiResponse::ok("Current user", user.into()))
}
