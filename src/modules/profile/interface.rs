use async_trait::async_trait;

use super::model::{Child, Profile};
use crate::error::Result;

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_profile(&self, user_id: &str) -> Result<Option<Profile>>;
    async fn find_children(&self, user_id: &str) -> Result<Vec<Child>>;

    /// Upserts the profile and replaces the user's whole set of children.
    async fn save(&self, profile: &Profile, children: &[Child]) -> Result<()>;
}
