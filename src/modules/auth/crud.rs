use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySql, Pool};

use super::interface::{RefreshTokenRepository, UserRepository};
use super::model::{RefreshToken, User};
use crate::error::{conflict_on_duplicate, Result};

const USER_COLUMNS: &str = "id, username, phone, email, password_hash, role, is_verified, \
     otp_hash, otp_expires_at, created_at, updated_at";

pub struct UserCrud {
    pool: Pool<MySql>,
}

impl UserCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE {} = ?", USER_COLUMNS, column);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for UserCrud {
    async fn create(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, phone, email, password_hash, role, is_verified,
                               otp_hash, otp_expires_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.phone)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.is_verified)
        .bind(&user.otp_hash)
        .bind(user.otp_expires_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_duplicate(e, "Username or phone already registered"))?;

        Ok(())
    }

    async fn update_registration(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET username = ?, phone = ?, email = ?, password_hash = ?,
                otp_hash = ?, otp_expires_at = ?, updated_at = ?
            WHERE id = ? AND is_verified = FALSE
            "#,
        )
        .bind(&user.username)
        .bind(&user.phone)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.otp_hash)
        .bind(user.otp_expires_at)
        .bind(Utc::now())
        .bind(&user.id)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_duplicate(e, "Username or phone already registered"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        self.find_one("id", id).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        self.find_one("username", username).await
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>> {
        self.find_one("phone", phone).await
    }

    async fn set_otp(
        &self,
        user_id: &str,
        otp_hash: Option<&str>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        sqlx::query("UPDATE users SET otp_hash = ?, otp_expires_at = ?, updated_at = ? WHERE id = ?")
            .bind(otp_hash)
            .bind(expires_at)
            .bind(Utc::now())
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn mark_verified(&self, user_id: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET is_verified = TRUE, otp_hash = NULL, otp_expires_at = NULL, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(Utc::now())
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<User>> {
        let sql = format!("SELECT {} FROM users ORDER BY created_at DESC", USER_COLUMNS);
        let users = sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?;
        Ok(users)
    }
}

pub struct RefreshTokenCrud {
    pool: Pool<MySql>,
}

impl RefreshTokenCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

async fn insert_refresh_token<'e, E>(executor: E, token: &RefreshToken) -> Result<()>
where
    E: sqlx::Executor<'e, Database = MySql>,
{
    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (id, user_id, token, expires_at, revoked,
                                    parent_token_id, replaced_by_id, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&token.id)
    .bind(&token.user_id)
    .bind(&token.token)
    .bind(token.expires_at)
    .bind(token.revoked)
    .bind(&token.parent_token_id)
    .bind(&token.replaced_by_id)
    .bind(token.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

#[async_trait]
impl RefreshTokenRepository for RefreshTokenCrud {
    async fn create(&self, token: &RefreshToken) -> Result<()> {
        insert_refresh_token(&self.pool, token).await
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>> {
        let record = sqlx::query_as::<_, RefreshToken>("SELECT * FROM refresh_tokens WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn rotate(&self, old_id: &str, replacement: &RefreshToken) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        insert_refresh_token(&mut *tx, replacement).await?;

        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked = TRUE, replaced_by_id = ? WHERE id = ? AND revoked = FALSE",
        )
        .bind(&replacement.id)
        .bind(old_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() != 1 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn revoke(&self, id: &str) -> Result<()> {
        sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: &str) -> Result<u64> {
        let result =
            sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE user_id = ? AND revoked = FALSE")
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<RefreshToken>> {
        let tokens = sqlx::query_as::<_, RefreshToken>(
            "SELECT * FROM refresh_tokens WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tokens)
    }
}
