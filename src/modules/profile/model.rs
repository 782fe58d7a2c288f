use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::modules::auth::schema::PHONE_RE;

lazy_static::lazy_static! {
    static ref PINCODE_RE: regex::Regex = regex::Regex::new(r"^[1-9][0-9]{5}$").unwrap();
}

/// The seven scored profile fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct ProfileDetails {
    #[validate(length(max = 255))]
    pub address: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(regex(path = *PINCODE_RE, message = "Pincode must be 6 digits"))]
    pub pincode: Option<String>,
    #[validate(length(max = 100))]
    pub education: Option<String>,
    #[validate(length(max = 50))]
    pub relation: Option<String>,
    #[validate(length(max = 100))]
    pub counterpart_name: Option<String>,
    #[validate(regex(path = *PHONE_RE, message = "Invalid phone number"))]
    pub counterpart_phone: Option<String>,
}

impl ProfileDetails {
    /// Trims every field and drops the ones left empty.
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            address: clean(self.address),
            city: clean(self.city),
            pincode: clean(self.pincode),
            education: clean(self.education),
            relation: clean(self.relation),
            counterpart_name: clean(self.counterpart_name),
            counterpart_phone: clean(self.counterpart_phone),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub user_id: String,
    #[sqlx(flatten)]
    pub details: ProfileDetails,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Child {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub class_name: Option<String>,
    pub created_at: DateTime<Utc>,
}
