use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{RefreshToken, User};
use crate::error::Result;

// =============================================================================
// REPOSITORY TRAITS
// =============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user; duplicate username or phone is a conflict.
    async fn create(&self, user: &User) -> Result<()>;

    /// Overwrites the registration details of a still-unverified user.
    async fn update_registration(&self, user: &User) -> Result<()>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>>;

    async fn set_otp(
        &self,
        user_id: &str,
        otp_hash: Option<&str>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<()>;

    /// Marks the user verified and clears the OTP.
    async fn mark_verified(&self, user_id: &str) -> Result<()>;

    /// All users, newest first.
    async fn list(&self) -> Result<Vec<User>>;
}

#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn create(&self, token: &RefreshToken) -> Result<()>;
    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>>;

    /// Stores `replacement` and revokes `old_id`, pointing it at the replacement.
    ///
    /// Returns `false`, storing nothing, when `old_id` was already revoked
    /// or is unknown: another rotation of the same token won.
    async fn rotate(&self, old_id: &str, replacement: &RefreshToken) -> Result<bool>;

    async fn revoke(&self, id: &str) -> Result<()>;

    /// Returns how many tokens were newly revoked.
    async fn revoke_all_for_user(&self, user_id: &str) -> Result<u64>;

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<RefreshToken>>;
}
