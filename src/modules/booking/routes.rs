use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::AppState;
use super::controller;

/// Mounted under the USER-gated prefix.
pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/bookings",
            get(controller::my_bookings).post(controller::create_booking),
        )
        .route("/bookings/verify", post(controller::verify_payment))
}
