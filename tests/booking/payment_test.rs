use axum::http::StatusCode;
use serde_json::{json, Value};
use std::collections::HashSet;

use crate::common::{sign_payment, TestContext};

fn ticket_codes(data: &Value) -> Vec<String> {
    data["tickets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["code"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn paid_booking_issues_one_ticket_per_seat() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_session().await;
    let user = ctx.user_session().await;
    let seminar_id = ctx.create_seminar(&admin, "500.00", 10).await;

    let booking = ctx.book(&user, &seminar_id, 2).await;
    assert_eq!(booking["total_price"], "1000.00");
    assert_eq!(booking["amount"], 100000);

    let response = ctx.pay(&user, &booking, "pay_abc123").await;
    response.assert_status_ok();

    let body: Value = response.json();
    let data = &body["data"];
    assert_eq!(data["status"], "PAID");
    assert_eq!(data["payment_id"], "pay_abc123");
    assert_eq!(data["payment_method"], "upi");
    assert_eq!(data["total_price"], "1000.00");

    let codes = ticket_codes(data);
    assert_eq!(codes.len(), 2);
    assert_eq!(codes.iter().collect::<HashSet<_>>().len(), 2);
    for code in &codes {
        let suffix = code.strip_prefix("STT-").unwrap();
        assert_eq!(suffix.len(), 10);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    let seminar: Value = ctx
        .server
        .get(&format!("/api/seminars/{}", seminar_id))
        .await
        .json();
    assert_eq!(seminar["data"]["available_seats"], 8);
}

#[tokio::test]
async fn verifying_twice_returns_the_same_tickets() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_session().await;
    let user = ctx.user_session().await;
    let seminar_id = ctx.create_seminar(&admin, "300.00", 10).await;

    let booking = ctx.book(&user, &seminar_id, 3).await;
    let first: Value = ctx.pay(&user, &booking, "pay_once").await.json();
    let second_response = ctx.pay(&user, &booking, "pay_once").await;
    second_response.assert_status_ok();
    let second: Value = second_response.json();

    let mut a = ticket_codes(&first["data"]);
    let mut b = ticket_codes(&second["data"]);
    a.sort();
    b.sort();
    assert_eq!(a, b);

    let booking_id = booking["booking_id"].as_str().unwrap();
    let stored = ctx.state.repos.bookings.tickets_for(booking_id).await.unwrap();
    assert_eq!(stored.len(), 3);
}

#[tokio::test]
async fn tampered_signature_is_rejected() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_session().await;
    let user = ctx.user_session().await;
    let seminar_id = ctx.create_seminar(&admin, "300.00", 10).await;
    let booking = ctx.book(&user, &seminar_id, 1).await;
    let order_id = booking["order_id"].as_str().unwrap();

    let mut signature = sign_payment(order_id, "pay_x");
    let last = signature.pop().unwrap();
    signature.push(if last == '0' { '1' } else { '0' });

    let response = ctx
        .server
        .post("/api/user/bookings/verify")
        .authorization_bearer(&user.access)
        .json(&json!({
            "booking_id": booking["booking_id"],
            "payment_id": "pay_x",
            "order_id": order_id,
            "signature": signature,
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Invalid payment signature");

    let booking_id = booking["booking_id"].as_str().unwrap();
    let stored = ctx.state.repos.bookings.find_by_id(booking_id).await.unwrap().unwrap();
    assert_eq!(stored.status.as_str(), "PENDING");
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    let ctx = TestContext::new().await;
    let user = ctx.user_session().await;

    let response = ctx
        .server
        .post("/api/user/bookings/verify")
        .authorization_bearer(&user.access)
        .json(&json!({ "booking_id": "b", "payment_id": "  ", "order_id": "o" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["errors"]["payment_id"].is_array());
    assert!(body["errors"]["signature"].is_array());
}

#[tokio::test]
async fn signature_for_another_order_is_rejected() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_session().await;
    let user = ctx.user_session().await;
    let seminar_id = ctx.create_seminar(&admin, "300.00", 10).await;
    let booking = ctx.book(&user, &seminar_id, 1).await;

    let response = ctx
        .server
        .post("/api/user/bookings/verify")
        .authorization_bearer(&user.access)
        .json(&json!({
            "booking_id": booking["booking_id"],
            "payment_id": "pay_y",
            "order_id": "order_elsewhere",
            "signature": sign_payment("order_elsewhere", "pay_y"),
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn another_users_booking_is_not_found() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_session().await;
    let owner = ctx.user_session().await;
    let stranger = ctx.user_session().await;
    let seminar_id = ctx.create_seminar(&admin, "300.00", 10).await;
    let booking = ctx.book(&owner, &seminar_id, 1).await;

    ctx.pay(&stranger, &booking, "pay_z")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn payment_after_seats_sold_out_cancels_booking() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_session().await;
    let first = ctx.user_session().await;
    let second = ctx.user_session().await;
    let seminar_id = ctx.create_seminar(&admin, "100.00", 2).await;

    let winner = ctx.book(&first, &seminar_id, 2).await;
    let loser = ctx.book(&second, &seminar_id, 1).await;

    ctx.pay(&first, &winner, "pay_win").await.assert_status_ok();
    ctx.pay(&second, &loser, "pay_lose")
        .await
        .assert_status(StatusCode::CONFLICT);

    let loser_id = loser["booking_id"].as_str().unwrap();
    let stored = ctx.state.repos.bookings.find_by_id(loser_id).await.unwrap().unwrap();
    assert_eq!(stored.status.as_str(), "CANCELLED");
    assert!(ctx.state.repos.bookings.tickets_for(loser_id).await.unwrap().is_empty());
    assert_eq!(ctx.state.repos.bookings.paid_seats(&seminar_id).await.unwrap(), 2);
}

#[tokio::test]
async fn my_bookings_lists_tickets_and_titles() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_session().await;
    let user = ctx.user_session().await;
    let seminar_id = ctx.create_seminar(&admin, "150.00", 10).await;

    let paid = ctx.book(&user, &seminar_id, 2).await;
    ctx.pay(&user, &paid, "pay_list").await.assert_status_ok();
    ctx.book(&user, &seminar_id, 1).await;

    let response = ctx
        .server
        .get("/api/user/bookings")
        .authorization_bearer(&user.access)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let bookings = body["data"].as_array().unwrap();
    assert_eq!(bookings.len(), 2);
    assert!(bookings
        .iter()
        .all(|b| b["seminar_title"] == "Exam Without Fear"));

    let paid_entry = bookings
        .iter()
        .find(|b| b["id"] == paid["booking_id"])
        .unwrap();
    assert_eq!(paid_entry["tickets"].as_array().unwrap().len(), 2);
}
