use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::model::{Seminar, SeminarStatus};

#[derive(Debug, Deserialize, Validate)]
pub struct SeminarRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[validate(range(min = 1, max = 1440, message = "Duration must be between 1 and 1440 minutes"))]
    pub duration_minutes: i32,
    #[validate(length(min = 1, max = 200, message = "Location is required"))]
    pub location: String,
    pub price: Decimal,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: i32,
    #[serde(default)]
    pub status: SeminarStatus,
    #[validate(url(message = "Invalid image URL"))]
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SeminarResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: i32,
    pub location: String,
    pub price: Decimal,
    pub capacity: i32,
    pub booked_seats: i64,
    pub available_seats: i64,
    pub status: SeminarStatus,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SeminarResponse {
    pub fn new(seminar: Seminar, booked_seats: i64) -> Self {
        let available_seats = (i64::from(seminar.capacity) - booked_seats).max(0);
        Self {
            id: seminar.id,
            title: seminar.title,
            description: seminar.description,
            date: seminar.date,
            time: seminar.time,
            duration_minutes: seminar.duration_minutes,
            location: seminar.location,
            price: seminar.price,
            capacity: seminar.capacity,
            booked_seats,
            available_seats,
            status: seminar.status,
            image_url: seminar.image_url,
            created_at: seminar.created_at,
            updated_at: seminar.updated_at,
        }
    }
}
