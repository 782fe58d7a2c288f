use axum::http::{header, StatusCode};
use serde_json::Value;

use crate::common::{test_settings, TestContext};

#[tokio::test]
async fn root_and_health() {
    let ctx = TestContext::new().await;

    let response = ctx.server.get("/").await;
    response.assert_status_ok();
    response.assert_text("Studytainment API");

    let response = ctx.server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn metrics_are_exposed_in_text_format() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_session().await;
    let user = ctx.user_session().await;
    let seminar_id = ctx.create_seminar(&admin, "10.00", 3).await;
    let booking = ctx.book(&user, &seminar_id, 1).await;
    ctx.pay(&user, &booking, "pay_metrics").await.assert_status_ok();

    let response = ctx.server.get("/metrics").await;
    response.assert_status_ok();

    let text = response.text();
    assert!(text.contains("studytainment_http_requests_total"));
    assert!(text.contains("studytainment_bookings_total{outcome=\"reserved\"} 1"));
    assert!(text.contains("studytainment_payments_total{outcome=\"verified\"} 1"));
    assert!(text.contains("studytainment_tickets_issued_total 1"));
}

#[tokio::test]
async fn security_headers_are_set() {
    let ctx = TestContext::new().await;

    let response = ctx.server.get("/api/seminars").await;
    response.assert_status_ok();
    assert_eq!(response.header(header::X_CONTENT_TYPE_OPTIONS), "nosniff");
    assert_eq!(response.header(header::X_FRAME_OPTIONS), "DENY");
    assert_eq!(response.header(header::CACHE_CONTROL), "no-store");

    let response = ctx.server.get("/health").await;
    assert!(response.maybe_header(header::CACHE_CONTROL).is_none());
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let ctx = TestContext::new().await;

    ctx.server
        .get("/api/nothing-here")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn requests_over_the_burst_are_throttled() {
    let settings = studytainment::config::Settings {
        rate_limit_burst: 3,
        rate_limit_per_second: 1,
        ..test_settings()
    };
    let ctx = TestContext::with_settings(settings).await;

    for _ in 0..3 {
        ctx.server.get("/health").await.assert_status_ok();
    }

    let response = ctx.server.get("/health").await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
}
