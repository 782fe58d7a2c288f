use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InquiryType {
    General,
    Seminar,
    Booking,
    Payment,
    Partnership,
    Feedback,
    Other,
}

impl InquiryType {
    pub const ALL: [InquiryType; 7] = [
        Self::General,
        Self::Seminar,
        Self::Booking,
        Self::Payment,
        Self::Partnership,
        Self::Feedback,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "GENERAL",
            Self::Seminar => "SEMINAR",
            Self::Booking => "BOOKING",
            Self::Payment => "PAYMENT",
            Self::Partnership => "PARTNERSHIP",
            Self::Feedback => "FEEDBACK",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for InquiryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InquiryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown inquiry type: {}", s))
    }
}

impl TryFrom<String> for InquiryType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InquiryStatus {
    Pending,
    InProgress,
    Resolved,
}

impl InquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
        }
    }
}

impl fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InquiryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "RESOLVED" => Ok(Self::Resolved),
            other => Err(format!("unknown inquiry status: {}", other)),
        }
    }
}

impl TryFrom<String> for InquiryStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Inquiry {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[sqlx(try_from = "String")]
    pub inquiry_type: InquiryType,
    pub subject: String,
    pub message: String,
    #[sqlx(try_from = "String")]
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
