pub mod client;
pub mod config;
pub mod error;
pub mod modules;
pub mod response;
pub mod services;
pub mod store;

use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_cookies::CookieManagerLayer;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use config::Settings;
use modules::{admin, auth, blog, booking, inquiry, metrics::metrics_routes, profile, seminar};
use services::guard::{require_admin, require_user};
use services::jwt::JwtService;
use services::metrics::{metrics_middleware, MetricsRegistry};
use services::payment::PaymentGateway;
use services::rate_limit::{create_rate_limiter, RateLimitLayer};
use services::security::security_headers;
use services::sms::SmsSender;
use store::Repositories;

pub struct AppState {
    pub repos: Repositories,
    pub jwt_service: JwtService,
    pub payments: Arc<dyn PaymentGateway>,
    pub sms: Arc<dyn SmsSender>,
    pub metrics: Arc<MetricsRegistry>,
    pub settings: Settings,
}

pub fn create_app(state: Arc<AppState>) -> Router {
    let rate_limiter = create_rate_limiter(
        state.settings.rate_limit_per_second,
        state.settings.rate_limit_burst,
    );

    let user_api = Router::new()
        .merge(auth::user_routes())
        .merge(profile::user_routes())
        .merge(booking::user_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    let admin_api = Router::new()
        .merge(seminar::admin_routes())
        .merge(blog::admin_routes())
        .merge(inquiry::admin_routes())
        .merge(admin::admin_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let api = Router::new()
        .nest("/auth", auth::auth_routes())
        .merge(seminar::public_routes())
        .merge(blog::public_routes())
        .merge(inquiry::public_routes())
        .nest("/user", user_api)
        .nest("/admin", admin_api);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(metrics_routes())
        .nest("/api", api)
        .layer(middleware::from_fn(security_headers))
        .layer(CookieManagerLayer::new())
        .layer(RequestBodyLimitLayer::new(1024 * 100)) // 100KB max body
        .layer(RateLimitLayer::new(rate_limiter))
        .layer(middleware::from_fn_with_state(
            state.metrics.clone(),
            metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> &'static str {
    "Studytainment API"
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
