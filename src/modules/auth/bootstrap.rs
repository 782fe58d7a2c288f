use chrono::Utc;
use uuid::Uuid;

use super::model::{Role, User};
use super::schema::normalize_phone;
use crate::config::AdminSeed;
use crate::error::{AppError, Result};
use crate::services::hashing;
use crate::store::Repositories;

/// Creates the seeded administrator unless the username is already taken.
/// Returns whether an account was created.
pub async fn ensure_admin(repos: &Repositories, seed: &AdminSeed) -> Result<bool> {
    if repos.users.find_by_username(&seed.username).await?.is_some() {
        return Ok(false);
    }

    let password_hash =
        hashing::hash_password(&seed.password).map_err(|e| AppError::Internal(e.to_string()))?;
    let now = Utc::now();

    let admin = User {
        id: Uuid::new_v4().to_string(),
        username: seed.username.clone(),
        phone: normalize_phone(&seed.phone),
        email: None,
        password_hash,
        role: Role::Admin,
        is_verified: true,
        otp_hash: None,
        otp_expires_at: None,
        created_at: now,
        updated_at: now,
    };

    repos.users.create(&admin).await?;
    tracing::info!(user_id = %admin.id, username = %admin.username, "admin account created");
    Ok(true)
}
