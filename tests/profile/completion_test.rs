use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::common::TestContext;

fn full_details() -> Value {
    json!({
        "address": "12 MG Road",
        "city": "Pune",
        "pincode": "411001",
        "education": "B.Com",
        "relation": "Father",
        "counterpart_name": "Anita",
        "counterpart_phone": "9876501234",
    })
}

#[tokio::test]
async fn new_user_profile_is_empty() {
    let ctx = TestContext::new().await;
    let user = ctx.user_session().await;

    let response = ctx
        .server
        .get("/api/user/profile")
        .authorization_bearer(&user.access)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["data"]["profile"].is_null());
    assert_eq!(body["data"]["completion"]["percentage"], 0);
    assert_eq!(
        body["data"]["completion"]["missing_fields"].as_array().unwrap().len(),
        7
    );
}

#[tokio::test]
async fn completion_reflects_fields_and_children() {
    let ctx = TestContext::new().await;
    let user = ctx.user_session().await;

    let response = ctx
        .server
        .put("/api/user/profile")
        .authorization_bearer(&user.access)
        .json(&full_details())
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["completion"]["percentage"], 70);

    let mut with_child = full_details();
    with_child["children"] = json!([{ "name": "Kabir", "age": 9, "class_name": "4th" }]);
    let response = ctx
        .server
        .put("/api/user/profile")
        .authorization_bearer(&user.access)
        .json(&with_child)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["completion"]["percentage"], 100);
    assert_eq!(body["data"]["children"][0]["name"], "Kabir");

    // Saving replaces the previous children.
    let mut replaced = full_details();
    replaced["children"] = json!([{ "name": "Tara" }]);
    let response = ctx
        .server
        .put("/api/user/profile")
        .authorization_bearer(&user.access)
        .json(&replaced)
        .await;
    let body: Value = response.json();
    let children = body["data"]["children"].as_array().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0]["name"], "Tara");
    assert_eq!(body["data"]["completion"]["percentage"], 70);
}

#[tokio::test]
async fn profile_validation() {
    let ctx = TestContext::new().await;
    let user = ctx.user_session().await;

    let mut bad_pincode = full_details();
    bad_pincode["pincode"] = json!("0123");
    ctx.server
        .put("/api/user/profile")
        .authorization_bearer(&user.access)
        .json(&bad_pincode)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let children: Vec<Value> = (0..11).map(|i| json!({ "name": format!("Child {}", i) })).collect();
    let mut too_many = full_details();
    too_many["children"] = json!(children);
    ctx.server
        .put("/api/user/profile")
        .authorization_bearer(&user.access)
        .json(&too_many)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn profile_requires_sign_in() {
    let ctx = TestContext::new().await;

    ctx.server
        .get("/api/user/profile")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
