use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::common::TestContext;

fn seminar_payload(title: &str, date: &str) -> Value {
    json!({
        "title": title,
        "description": "Hands-on session",
        "date": date,
        "time": "16:30:00",
        "duration_minutes": 60,
        "location": "Mumbai",
        "price": "0.00",
        "capacity": 20,
        "status": "UPCOMING",
    })
}

#[tokio::test]
async fn public_list_is_ordered_by_date_with_availability() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_session().await;

    for (title, date) in [("Later", "2026-12-20"), ("Sooner", "2026-11-02")] {
        ctx.server
            .post("/api/admin/seminars")
            .authorization_bearer(&admin.access)
            .json(&seminar_payload(title, date))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = ctx.server.get("/api/seminars").await;
    response.assert_status_ok();

    let body: Value = response.json();
    let seminars = body["data"].as_array().unwrap();
    assert_eq!(seminars.len(), 2);
    assert_eq!(seminars[0]["title"], "Sooner");
    assert_eq!(seminars[1]["title"], "Later");
    assert_eq!(seminars[0]["available_seats"], 20);
    assert_eq!(seminars[0]["booked_seats"], 0);
}

#[tokio::test]
async fn seminar_validation() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_session().await;

    let mut negative_price = seminar_payload("Pricing", "2026-11-02");
    negative_price["price"] = json!("-1.00");
    ctx.server
        .post("/api/admin/seminars")
        .authorization_bearer(&admin.access)
        .json(&negative_price)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let mut zero_capacity = seminar_payload("Capacity", "2026-11-02");
    zero_capacity["capacity"] = json!(0);
    ctx.server
        .post("/api/admin/seminars")
        .authorization_bearer(&admin.access)
        .json(&zero_capacity)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let mut blank_title = seminar_payload("", "2026-11-02");
    blank_title["duration_minutes"] = json!(0);
    let response = ctx
        .server
        .post("/api/admin/seminars")
        .authorization_bearer(&admin.access)
        .json(&blank_title)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["errors"]["title"].is_array());
    assert!(body["errors"]["duration_minutes"].is_array());
}

#[tokio::test]
async fn price_must_fit_in_paise() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_session().await;

    for price in ["10.005", "100000000.00"] {
        let mut payload = seminar_payload("Precision", "2026-11-02");
        payload["price"] = json!(price);
        ctx.server
            .post("/api/admin/seminars")
            .authorization_bearer(&admin.access)
            .json(&payload)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    let mut trailing_zero = seminar_payload("Trailing zero", "2026-11-02");
    trailing_zero["price"] = json!("10.500");
    ctx.server
        .post("/api/admin/seminars")
        .authorization_bearer(&admin.access)
        .json(&trailing_zero)
        .await
        .assert_status(StatusCode::CREATED);

    // The largest accepted price still opens a payment order.
    let user = ctx.user_session().await;
    let seminar_id = ctx.create_seminar(&admin, "99999999.99", 5).await;
    let booking = ctx.book(&user, &seminar_id, 1).await;
    assert_eq!(booking["amount"], 9_999_999_999i64);
}

#[tokio::test]
async fn update_and_delete_seminar() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_session().await;
    let seminar_id = ctx.create_seminar(&admin, "100.00", 10).await;

    let mut update = seminar_payload("Renamed", "2026-11-10");
    update["status"] = json!("ONGOING");
    let response = ctx
        .server
        .put(&format!("/api/admin/seminars/{}", seminar_id))
        .authorization_bearer(&admin.access)
        .json(&update)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["title"], "Renamed");
    assert_eq!(body["data"]["status"], "ONGOING");

    ctx.server
        .delete(&format!("/api/admin/seminars/{}", seminar_id))
        .authorization_bearer(&admin.access)
        .await
        .assert_status_ok();

    ctx.server
        .get(&format!("/api/seminars/{}", seminar_id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn seminar_with_bookings_cannot_be_deleted() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_session().await;
    let user = ctx.user_session().await;
    let seminar_id = ctx.create_seminar(&admin, "100.00", 10).await;
    ctx.book(&user, &seminar_id, 1).await;

    ctx.server
        .delete(&format!("/api/admin/seminars/{}", seminar_id))
        .authorization_bearer(&admin.access)
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn seminar_admin_routes_are_gated() {
    let ctx = TestContext::new().await;
    let user = ctx.user_session().await;

    ctx.server
        .post("/api/admin/seminars")
        .json(&seminar_payload("Anon", "2026-11-02"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    ctx.server
        .post("/api/admin/seminars")
        .authorization_bearer(&user.access)
        .json(&seminar_payload("User", "2026-11-02"))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}
