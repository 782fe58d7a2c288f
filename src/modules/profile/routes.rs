use axum::{routing::get, Router};
use std::sync::Arc;

use crate::AppState;
use super::controller;

/// Mounted under the USER-gated prefix.
pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/profile",
        get(controller::get_profile).put(controller::update_profile),
    )
}
