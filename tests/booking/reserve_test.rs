use axum::http::StatusCode;
use serde_json::{json, Value};
use std::sync::atomic::Ordering;

use crate::common::TestContext;

#[tokio::test]
async fn booking_opens_order_in_minor_units() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_session().await;
    let user = ctx.user_session().await;
    let seminar_id = ctx.create_seminar(&admin, "99.99", 10).await;

    let data = ctx.book(&user, &seminar_id, 3).await;

    assert_eq!(data["total_price"], "299.97");
    assert_eq!(data["amount"], 29997);
    assert_eq!(data["currency"], "INR");
    assert_eq!(data["key_id"], "rzp_test_key");
    assert!(data["order_id"].as_str().unwrap().starts_with("order_test_"));

    let orders = ctx.gateway.orders.lock().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].amount, 29997);
    let booking_id = data["booking_id"].as_str().unwrap();
    assert_eq!(orders[0].receipt, format!("bk_{}", booking_id.replace('-', "")));
}

#[tokio::test]
async fn booking_beyond_remaining_seats_reports_exact_count() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_session().await;
    let buyer = ctx.user_session().await;
    let late = ctx.user_session().await;
    let seminar_id = ctx.create_seminar(&admin, "250.00", 5).await;

    let booking = ctx.book(&buyer, &seminar_id, 3).await;
    ctx.pay(&buyer, &booking, "pay_first").await.assert_status_ok();

    let response = ctx
        .server
        .post("/api/user/bookings")
        .authorization_bearer(&late.access)
        .json(&json!({ "seminar_id": &seminar_id, "quantity": 3 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Only 2 seats available");

    ctx.book(&late, &seminar_id, 2).await;
}

#[tokio::test]
async fn pending_bookings_do_not_hold_seats() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_session().await;
    let first = ctx.user_session().await;
    let second = ctx.user_session().await;
    let seminar_id = ctx.create_seminar(&admin, "100.00", 2).await;

    ctx.book(&first, &seminar_id, 2).await;
    ctx.book(&second, &seminar_id, 2).await;

    let response = ctx.server.get(&format!("/api/seminars/{}", seminar_id)).await;
    let body: Value = response.json();
    assert_eq!(body["data"]["available_seats"], 2);
}

#[tokio::test]
async fn invalid_quantity_and_unknown_seminar() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_session().await;
    let user = ctx.user_session().await;
    let seminar_id = ctx.create_seminar(&admin, "100.00", 2).await;

    ctx.server
        .post("/api/user/bookings")
        .authorization_bearer(&user.access)
        .json(&json!({ "seminar_id": &seminar_id, "quantity": 0 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    ctx.server
        .post("/api/user/bookings")
        .authorization_bearer(&user.access)
        .json(&json!({ "seminar_id": &seminar_id, "quantity": 3 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    ctx.server
        .post("/api/user/bookings")
        .authorization_bearer(&user.access)
        .json(&json!({ "seminar_id": "missing", "quantity": 1 }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn gateway_failure_leaves_pending_booking_without_order() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_session().await;
    let user = ctx.user_session().await;
    let seminar_id = ctx.create_seminar(&admin, "100.00", 5).await;

    ctx.gateway.fail.store(true, Ordering::SeqCst);
    let response = ctx
        .server
        .post("/api/user/bookings")
        .authorization_bearer(&user.access)
        .json(&json!({ "seminar_id": &seminar_id, "quantity": 1 }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert!(!body["message"].as_str().unwrap().contains("gateway unavailable"));

    let bookings = ctx.state.repos.bookings.list_all().await.unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].booking.status.as_str(), "PENDING");
    assert!(bookings[0].booking.order_id.is_none());
}
