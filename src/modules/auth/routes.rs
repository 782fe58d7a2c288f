use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::AppState;
use super::controller;

pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", post(controller::signup))
        .route("/verify-otp", post(controller::verify_otp))
        .route("/resend-otp", post(controller::resend_otp))
        .route("/signin", post(controller::signin))
        .route("/admin/signin", post(controller::admin_signin))
        .route("/refresh", post(controller::refresh))
        .route("/signout", post(controller::signout))
}

/// Mounted under the USER-gated prefix.
pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new().route("/me", get(controller::me))
}
