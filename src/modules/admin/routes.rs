use axum::{routing::get, Router};
use std::sync::Arc;

use crate::AppState;
use super::controller;

/// Back-office listings and exports, mounted under the ADMIN-gated prefix.
pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(controller::list_users))
        .route("/bookings", get(controller::list_bookings))
        .route("/export/users", get(controller::export_users))
        .route("/export/bookings", get(controller::export_bookings))
        .route("/export/inquiries", get(controller::export_inquiries))
}
