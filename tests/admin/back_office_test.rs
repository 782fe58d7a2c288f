use axum::http::{header, StatusCode};
use serde_json::{json, Value};

use crate::common::TestContext;

#[tokio::test]
async fn admin_lists_users_and_bookings() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_session().await;
    let (username, _, user) = ctx.register_user().await;
    let seminar_id = ctx.create_seminar(&admin, "250.00", 5).await;
    let booking = ctx.book(&user, &seminar_id, 2).await;
    ctx.pay(&user, &booking, "pay_admin_list").await.assert_status_ok();

    let body: Value = ctx
        .server
        .get("/api/admin/users")
        .authorization_bearer(&admin.access)
        .await
        .json();
    let users = body["data"].as_array().unwrap();
    assert!(users.iter().any(|u| u["username"] == username.as_str()));
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));

    let body: Value = ctx
        .server
        .get("/api/admin/bookings")
        .authorization_bearer(&admin.access)
        .await
        .json();
    let bookings = body["data"].as_array().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["username"], username.as_str());
    assert_eq!(bookings[0]["seminar_title"], "Exam Without Fear");
    assert_eq!(bookings[0]["status"], "PAID");
    assert_eq!(bookings[0]["tickets"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn back_office_is_admin_only() {
    let ctx = TestContext::new().await;
    let user = ctx.user_session().await;

    for path in ["/api/admin/users", "/api/admin/bookings", "/api/admin/export/users"] {
        ctx.server
            .get(path)
            .authorization_bearer(&user.access)
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }
}

#[tokio::test]
async fn bookings_export_is_a_csv_download() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_session().await;
    let user = ctx.user_session().await;
    let seminar_id = ctx.create_seminar(&admin, "120.50", 10).await;
    let booking = ctx.book(&user, &seminar_id, 1).await;
    ctx.pay(&user, &booking, "pay_export").await.assert_status_ok();

    let response = ctx
        .server
        .get("/api/admin/export/bookings")
        .authorization_bearer(&admin.access)
        .await;
    response.assert_status_ok();

    assert_eq!(
        response.header(header::CONTENT_TYPE).to_str().unwrap(),
        "text/csv; charset=utf-8"
    );
    assert_eq!(
        response.header(header::CONTENT_DISPOSITION).to_str().unwrap(),
        "attachment; filename=\"bookings.csv\""
    );

    let text = response.text();
    let lines: Vec<&str> = text.split("\r\n").filter(|l| !l.is_empty()).collect();
    assert_eq!(
        lines[0],
        "id,seminar,username,quantity,total_price,status,order_id,payment_id,payment_method,created_at"
    );
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains(",Exam Without Fear,"));
    assert!(lines[1].contains(",120.50,PAID,"));
    assert!(lines[1].contains(",pay_export,upi,"));
}

#[tokio::test]
async fn inquiries_export_quotes_free_text() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_session().await;

    ctx.server
        .post("/api/inquiries")
        .json(&json!({
            "name": "Ravi",
            "email": "ravi@example.com",
            "subject": "Dates, venues",
            "message": "Is the \"weekend\" batch open?",
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = ctx
        .server
        .get("/api/admin/export/inquiries")
        .authorization_bearer(&admin.access)
        .await;
    response.assert_status_ok();

    let text = response.text();
    assert!(text.starts_with("id,name,email,phone,type,subject,message,status,created_at\r\n"));
    assert!(text.contains(",GENERAL,\"Dates, venues\",\"Is the \"\"weekend\"\" batch open?\",PENDING,"));
}

#[tokio::test]
async fn users_export_lists_every_account() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_session().await;
    let (username, phone, _) = ctx.register_user().await;

    let response = ctx
        .server
        .get("/api/admin/export/users")
        .authorization_bearer(&admin.access)
        .await;
    response.assert_status_ok();

    let text = response.text();
    assert!(text.starts_with("id,username,phone,email,role,verified,created_at\r\n"));
    assert!(text.contains(&format!(",{},{},,USER,true,", username, phone)));
    assert!(text.contains(",ADMIN,true,"));
}
