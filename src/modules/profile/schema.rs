use serde::{Deserialize, Serialize};
use validator::Validate;

use super::completion::ProfileCompletion;
use super::model::{Child, ProfileDetails};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChildInput {
    #[validate(length(min = 1, max = 100, message = "Child name is required"))]
    pub name: String,
    #[validate(range(min = 1, max = 25, message = "Age must be between 1 and 25"))]
    pub age: Option<i32>,
    #[validate(length(max = 20))]
    pub gender: Option<String>,
    #[validate(length(max = 50))]
    pub class_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub details: ProfileDetails,
    #[serde(default)]
    #[validate(nested)]
    pub children: Vec<ChildInput>,
}

#[derive(Debug, Serialize)]
pub struct ChildResponse {
    pub id: String,
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub class_name: Option<String>,
}

impl From<Child> for ChildResponse {
    fn from(child: Child) -> Self {
        Self {
            id: child.id,
            name: child.name,
            age: child.age,
            gender: child.gender,
            class_name: child.class_name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: Option<ProfileDetails>,
    pub children: Vec<ChildResponse>,
    pub completion: ProfileCompletion,
}
