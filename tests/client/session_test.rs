use std::time::Duration;

use serde_json::{json, Value};
use tokio::net::TcpListener;

use studytainment::client::{ApiClient, ClientError};
use studytainment::services::jwt::JwtService;

use crate::common::{test_jwt, test_password, test_settings, TestContext};

/// Serves the context's app on an ephemeral local port.
async fn spawn_server(ctx: &TestContext) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = studytainment::create_app(ctx.state.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

async fn signed_in_client(ctx: &TestContext, base_url: &str) -> (ApiClient, String) {
    let (username, _, _) = ctx.register_user().await;
    let client = ApiClient::new(base_url).unwrap();

    let user: Value = client
        .post_json(
            "/api/auth/signin",
            &json!({ "identifier": &username, "password": test_password() }),
        )
        .await
        .unwrap();
    assert_eq!(user["username"], username.as_str());

    (client, username)
}

fn rotations(ctx: &TestContext) -> f64 {
    ctx.state
        .metrics
        .refresh_rotations_total
        .with_label_values(&["rotated"])
        .get()
}

#[tokio::test]
async fn signed_in_client_reads_protected_data() {
    let ctx = TestContext::new().await;
    let base_url = spawn_server(&ctx).await;
    let (client, username) = signed_in_client(&ctx, &base_url).await;

    let me: Value = client.get_json("/api/user/me").await.unwrap();
    assert_eq!(me["username"], username.as_str());
    assert_eq!(rotations(&ctx), 0.0);
}

#[tokio::test]
async fn expired_access_cookie_is_refreshed_transparently() {
    let jwt = test_jwt().with_access_token_duration(chrono::Duration::seconds(1));
    let ctx = TestContext::with_jwt(test_settings(), jwt).await;
    let base_url = spawn_server(&ctx).await;
    let (client, username) = signed_in_client(&ctx, &base_url).await;

    tokio::time::sleep(Duration::from_millis(1500)).await;

    let me: Value = client.get_json("/api/user/me").await.unwrap();
    assert_eq!(me["username"], username.as_str());
    assert_eq!(rotations(&ctx), 1.0);
}

#[tokio::test]
async fn concurrent_requests_all_recover_after_expiry() {
    let jwt = test_jwt().with_access_token_duration(chrono::Duration::seconds(1));
    let ctx = TestContext::with_jwt(test_settings(), jwt).await;
    let base_url = spawn_server(&ctx).await;
    let (client, username) = signed_in_client(&ctx, &base_url).await;

    tokio::time::sleep(Duration::from_millis(1500)).await;

    let results = futures::future::join_all(
        (0..5).map(|_| client.get_json::<Value>("/api/user/me")),
    )
    .await;

    for result in results {
        assert_eq!(result.unwrap()["username"], username.as_str());
    }
    assert!(rotations(&ctx) >= 1.0);
}

#[tokio::test]
async fn refresh_is_attempted_at_most_twice() {
    // Every access cookie is already expired when it is set.
    let jwt = JwtService::new("short-access".to_string(), "short-refresh".to_string())
        .with_access_token_duration(chrono::Duration::seconds(-120));
    let ctx = TestContext::with_jwt(test_settings(), jwt).await;
    let base_url = spawn_server(&ctx).await;
    let (username, _, _) = ctx.register_user().await;

    let client = ApiClient::new(&base_url).unwrap();
    let _: Value = client
        .post_json(
            "/api/auth/signin",
            &json!({ "identifier": &username, "password": test_password() }),
        )
        .await
        .unwrap();

    let result = client.get_json::<Value>("/api/user/me").await;
    assert!(matches!(result, Err(ClientError::SignInRequired)));
    assert_eq!(rotations(&ctx), 2.0);
}

#[tokio::test]
async fn signed_out_client_must_sign_in_again() {
    let ctx = TestContext::new().await;
    let base_url = spawn_server(&ctx).await;
    let (client, _) = signed_in_client(&ctx, &base_url).await;

    let () = client
        .post_json("/api/auth/signout", &json!({}))
        .await
        .unwrap();

    let result = client.get_json::<Value>("/api/user/me").await;
    assert!(matches!(result, Err(ClientError::SignInRequired)));
}

#[tokio::test]
async fn api_errors_carry_status_and_message() {
    let ctx = TestContext::new().await;
    let base_url = spawn_server(&ctx).await;
    let client = ApiClient::new(&base_url).unwrap();

    let result = client
        .post_json::<_, Value>(
            "/api/inquiries",
            &json!({
                "name": "Ravi",
                "email": "ravi@example.com",
                "inquiry_type": "COMPLAINT",
                "subject": "Hi",
                "message": "Hello",
            }),
        )
        .await;

    match result {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid inquiry type");
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}
