use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::{header, HeaderName, HeaderValue};
use axum_test::{TestResponse, TestServer};
use serde_json::{json, Value};

use studytainment::config::{AdminSeed, Settings};
use studytainment::modules::auth::bootstrap::ensure_admin;
use studytainment::services::jwt::JwtService;
use studytainment::services::metrics::MetricsRegistry;
use studytainment::services::payment::{
    generate_payment_signature, GatewayOrder, OrderRequest, PaymentError, PaymentGateway,
};
use studytainment::services::sms::{SmsError, SmsSender};
use studytainment::store::Repositories;
use studytainment::AppState;

#[allow(dead_code)]
pub const TEST_KEY_ID: &str = "rzp_test_key";
#[allow(dead_code)]
pub const TEST_KEY_SECRET: &str = "rzp_test_secret";
#[allow(dead_code)]
pub const ADMIN_USERNAME: &str = "site_admin";
#[allow(dead_code)]
pub const ADMIN_PASSWORD: &str = "AdminPassword123";

/// Payment gateway double that records every order it opens.
#[derive(Default)]
pub struct MockGateway {
    pub orders: Mutex<Vec<OrderRequest>>,
    pub fail: AtomicBool,
    next_id: AtomicUsize,
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_order(&self, request: &OrderRequest) -> Result<GatewayOrder, PaymentError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PaymentError::Api("gateway unavailable".to_string()));
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.orders.lock().unwrap().push(request.clone());
        Ok(GatewayOrder {
            id: format!("order_test_{}", n),
            amount: request.amount,
            currency: request.currency.clone(),
        })
    }

    async fn fetch_payment_method(&self, _payment_id: &str) -> Result<Option<String>, PaymentError> {
        Ok(Some("upi".to_string()))
    }
}

/// SMS double that keeps every message it was asked to send.
#[derive(Default)]
pub struct CapturingSms {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail: AtomicBool,
}

#[allow(dead_code)]
impl CapturingSms {
    pub fn last_code_for(&self, phone: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == phone)
            .map(|(_, body)| body.chars().take(6).collect())
    }

    pub fn count_for(&self, phone: &str) -> usize {
        self.sent.lock().unwrap().iter().filter(|(to, _)| to == phone).count()
    }
}

#[async_trait]
impl SmsSender for CapturingSms {
    async fn send(&self, to: &str, body: &str) -> Result<(), SmsError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SmsError::Rejected("provider down".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), body.to_string()));
        Ok(())
    }
}

/// Tokens taken from the auth cookies of a sign-in response.
#[derive(Debug, Clone)]
pub struct Session {
    pub access: String,
    pub refresh: String,
}

#[allow(dead_code)]
impl Session {
    pub fn from_response(response: &TestResponse) -> Self {
        Self {
            access: response.cookie("accessToken").value().to_string(),
            refresh: response.cookie("refreshToken").value().to_string(),
        }
    }
}

#[allow(dead_code)]
pub fn cookie_header(name: &str, value: &str) -> (HeaderName, HeaderValue) {
    (
        header::COOKIE,
        HeaderValue::from_str(&format!("{}={}", name, value)).unwrap(),
    )
}

#[allow(dead_code)]
pub fn test_settings() -> Settings {
    Settings {
        cookie_secure: false,
        payment_key_id: TEST_KEY_ID.to_string(),
        payment_key_secret: TEST_KEY_SECRET.to_string(),
        rate_limit_burst: 10_000,
        rate_limit_per_second: 10_000,
        ..Settings::default()
    }
}

/// Unique username and Indian mobile number for one test user.
#[allow(dead_code)]
pub fn unique_identity() -> (String, String) {
    let n = uuid::Uuid::new_v4().as_u128();
    let username = format!("user_{}", n % 1_000_000_000_000);
    let phone = format!("9{:09}", n % 1_000_000_000);
    (username, phone)
}

#[allow(dead_code)]
pub fn test_password() -> &'static str {
    "TestPassword123!"
}

#[allow(dead_code)]
pub fn test_jwt() -> JwtService {
    JwtService::new(
        "test-access-secret".to_string(),
        "test-refresh-secret".to_string(),
    )
}

#[allow(dead_code)]
pub fn sign_payment(order_id: &str, payment_id: &str) -> String {
    generate_payment_signature(TEST_KEY_SECRET, order_id, payment_id)
}

#[allow(dead_code)]
pub struct TestContext {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub gateway: Arc<MockGateway>,
    pub sms: Arc<CapturingSms>,
}

#[allow(dead_code)]
impl TestContext {
    pub async fn new() -> Self {
        Self::with_settings(test_settings()).await
    }

    pub async fn with_settings(settings: Settings) -> Self {
        Self::with_jwt(settings, test_jwt()).await
    }

    pub async fn with_jwt(settings: Settings, jwt_service: JwtService) -> Self {
        let gateway = Arc::new(MockGateway::default());
        let sms = Arc::new(CapturingSms::default());

        let state = Arc::new(AppState {
            repos: Repositories::in_memory(),
            jwt_service,
            payments: gateway.clone(),
            sms: sms.clone(),
            metrics: MetricsRegistry::new().expect("Failed to create metrics registry"),
            settings,
        });

        let app = studytainment::create_app(state.clone());
        let server = TestServer::new(app).expect("Failed to create test server");

        Self {
            server,
            state,
            gateway,
            sms,
        }
    }

    /// Signs up and verifies a fresh user, returning their session.
    pub async fn register_user(&self) -> (String, String, Session) {
        let (username, phone) = unique_identity();

        self.server
            .post("/api/auth/signup")
            .json(&json!({
                "username": &username,
                "phone": &phone,
                "password": test_password(),
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let otp = self.sms.last_code_for(&phone).expect("OTP was not sent");
        let response = self
            .server
            .post("/api/auth/verify-otp")
            .json(&json!({ "phone": &phone, "otp": otp }))
            .await;
        response.assert_status_ok();

        let session = Session::from_response(&response);
        (username, phone, session)
    }

    pub async fn user_session(&self) -> Session {
        self.register_user().await.2
    }

    pub async fn admin_session(&self) -> Session {
        let seed = AdminSeed {
            username: ADMIN_USERNAME.to_string(),
            phone: "9000000001".to_string(),
            password: ADMIN_PASSWORD.to_string(),
        };
        ensure_admin(&self.state.repos, &seed)
            .await
            .expect("Failed to seed admin");

        let response = self
            .server
            .post("/api/auth/admin/signin")
            .json(&json!({ "identifier": ADMIN_USERNAME, "password": ADMIN_PASSWORD }))
            .await;
        response.assert_status_ok();

        Session::from_response(&response)
    }

    pub async fn create_seminar(&self, admin: &Session, price: &str, capacity: i32) -> String {
        let response = self
            .server
            .post("/api/admin/seminars")
            .authorization_bearer(&admin.access)
            .json(&json!({
                "title": "Exam Without Fear",
                "description": "Study habits for board exams",
                "date": "2026-12-05",
                "time": "10:00:00",
                "duration_minutes": 90,
                "location": "Pune",
                "price": price,
                "capacity": capacity,
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);

        let body: Value = response.json();
        body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Creates a booking and returns the response `data`.
    pub async fn book(&self, user: &Session, seminar_id: &str, quantity: i32) -> Value {
        let response = self
            .server
            .post("/api/user/bookings")
            .authorization_bearer(&user.access)
            .json(&json!({ "seminar_id": seminar_id, "quantity": quantity }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);

        let body: Value = response.json();
        body["data"].clone()
    }

    /// Submits a correctly signed payment callback for `booking`.
    pub async fn pay(&self, user: &Session, booking: &Value, payment_id: &str) -> TestResponse {
        let order_id = booking["order_id"].as_str().unwrap();
        self.server
            .post("/api/user/bookings/verify")
            .authorization_bearer(&user.access)
            .json(&json!({
                "booking_id": booking["booking_id"],
                "payment_id": payment_id,
                "order_id": order_id,
                "signature": sign_payment(order_id, payment_id),
            }))
            .await
    }
}
