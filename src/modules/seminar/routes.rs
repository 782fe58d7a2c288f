use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::AppState;
use super::controller;

pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/seminars", get(controller::list_seminars))
        .route("/seminars/{id}", get(controller::get_seminar))
}

/// Mounted under the ADMIN-gated prefix.
pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/seminars",
            get(controller::list_seminars).post(controller::create_seminar),
        )
        .route(
            "/seminars/{id}",
            put(controller::update_seminar).delete(controller::delete_seminar),
        )
}
