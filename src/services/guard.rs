use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, OriginalUri, Request, State},
    http::{header, request::Parts, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_cookies::Cookies;

use crate::error::AppError;
use crate::modules::auth::model::Role;
use crate::services::cookies::{read_cookie, ACCESS_TOKEN_COOKIE};
use crate::services::jwt::AccessClaims;
use crate::AppState;

/// Routing-layer checkpoint for `/api/admin`.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    request: Request,
    next: Next,
) -> Response {
    authorize(&state, &cookies, request, next, Role::Admin).await
}

/// Routing-layer checkpoint for `/api/user`.
pub async fn require_user(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    request: Request,
    next: Next,
) -> Response {
    authorize(&state, &cookies, request, next, Role::User).await
}

async fn authorize(
    state: &AppState,
    cookies: &Cookies,
    mut request: Request,
    next: Next,
    required: Role,
) -> Response {
    let token = read_cookie(cookies, ACCESS_TOKEN_COOKIE)
        .or_else(|| bearer_token(request.headers()));

    let Some(claims) = token.and_then(|t| state.jwt_service.verify_access_token(&t)) else {
        // Nested routers see a stripped URI; redirect back to the full one.
        let path = request
            .extensions()
            .get::<OriginalUri>()
            .map(|original| original.0.path().to_string())
            .unwrap_or_else(|| request.uri().path().to_string());
        tracing::debug!(path = %path, "missing or invalid access token");
        if wants_html(request.headers()) {
            return redirect_to_refresh(&state.settings.silent_refresh_path, &path);
        }
        return AppError::Unauthorized("Authentication required".to_string()).into_response();
    };

    if claims.role != required {
        return AppError::Forbidden("You do not have access to this resource".to_string())
            .into_response();
    }

    request.extensions_mut().insert(claims);
    next.run(request).await
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer ").or_else(|| v.strip_prefix("bearer ")))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

fn redirect_to_refresh(refresh_path: &str, original_path: &str) -> Response {
    let location = format!("{}?redirect={}", refresh_path, original_path);
    match HeaderValue::from_str(&location) {
        Ok(value) => (StatusCode::SEE_OTHER, [(header::LOCATION, value)]).into_response(),
        Err(_) => AppError::Unauthorized("Authentication required".to_string()).into_response(),
    }
}

/// Identity the checkpoint attached to the request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AccessClaims);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AccessClaims>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

impl std::ops::Deref for CurrentUser {
    type Target = AccessClaims;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
