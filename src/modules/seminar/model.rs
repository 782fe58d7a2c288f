use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeminarStatus {
    #[default]
    Upcoming,
    Ongoing,
    Completed,
}

impl SeminarStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "UPCOMING",
            Self::Ongoing => "ONGOING",
            Self::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for SeminarStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeminarStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UPCOMING" => Ok(Self::Upcoming),
            "ONGOING" => Ok(Self::Ongoing),
            "COMPLETED" => Ok(Self::Completed),
            other => Err(format!("unknown seminar status: {}", other)),
        }
    }
}

impl TryFrom<String> for SeminarStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Seminar {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: i32,
    pub location: String,
    pub price: Decimal,
    pub capacity: i32,
    #[sqlx(try_from = "String")]
    pub status: SeminarStatus,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
