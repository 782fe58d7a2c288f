use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::AppState;
use super::controller;

pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/blogs", get(controller::list_published))
        .route("/blogs/{slug}", get(controller::get_by_slug))
}

/// Mounted under the ADMIN-gated prefix.
pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/blogs", get(controller::list_all).post(controller::create_blog))
        .route(
            "/blogs/{id}",
            put(controller::update_blog).delete(controller::delete_blog),
        )
}
