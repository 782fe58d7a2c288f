use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::AppState;
use super::controller;

pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/inquiries", post(controller::create_inquiry))
}

/// Mounted under the ADMIN-gated prefix.
pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/inquiries", get(controller::list_inquiries))
        .route("/inquiries/{id}/status", patch(controller::update_inquiry_status))
}
