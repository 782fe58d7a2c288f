use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::model::{Role, User};

lazy_static! {
    pub static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_]{3,30}$").unwrap();
    pub static ref PHONE_RE: Regex = Regex::new(r"^(\+91)?[6-9][0-9]{9}$").unwrap();
    pub static ref OTP_RE: Regex = Regex::new(r"^[0-9]{6}$").unwrap();
}

/// Strips the optional country prefix so `+919876543210` and `9876543210`
/// address the same account.
pub fn normalize_phone(phone: &str) -> String {
    let trimmed = phone.trim();
    trimmed.strip_prefix("+91").unwrap_or(trimmed).to_string()
}

// =============================================================================
// SIGN UP
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(regex(
        path = *USERNAME_RE,
        message = "Username must be 3-30 letters, digits or underscores"
    ))]
    pub username: String,
    #[validate(regex(path = *PHONE_RE, message = "Invalid phone number"))]
    pub phone: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 8, max = 128, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct OtpSentResponse {
    pub phone: String,
    pub otp_expires_at: DateTime<Utc>,
}

// =============================================================================
// OTP
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(regex(path = *PHONE_RE, message = "Invalid phone number"))]
    pub phone: String,
    #[validate(regex(path = *OTP_RE, message = "OTP must be 6 digits"))]
    pub otp: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResendOtpRequest {
    #[validate(regex(path = *PHONE_RE, message = "Invalid phone number"))]
    pub phone: String,
}

// =============================================================================
// SIGN IN
// =============================================================================

/// `identifier` is either the username or the phone number.
#[derive(Debug, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(length(min = 1, message = "Username or phone is required"))]
    pub identifier: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

// =============================================================================
// CURRENT USER
// =============================================================================

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub phone: String,
    pub email: Option<String>,
    pub role: Role,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            phone: user.phone,
            email: user.email,
            role: user.role,
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}
