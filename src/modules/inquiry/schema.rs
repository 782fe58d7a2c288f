use serde::Deserialize;
use validator::Validate;

use crate::modules::auth::schema::PHONE_RE;

/// Enum values arrive as plain strings so an unknown value is a 400
/// validation error rather than a body rejection.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInquiryRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(regex(path = *PHONE_RE, message = "Invalid phone number"))]
    pub phone: Option<String>,
    #[serde(default = "default_inquiry_type")]
    pub inquiry_type: String,
    #[validate(length(min = 1, max = 200, message = "Subject is required"))]
    pub subject: String,
    #[validate(length(min = 1, max = 5000, message = "Message is required"))]
    pub message: String,
}

fn default_inquiry_type() -> String {
    "GENERAL".to_string()
}

#[derive(Debug, Deserialize)]
pub struct UpdateInquiryStatusRequest {
    #[serde(default)]
    pub status: String,
}
