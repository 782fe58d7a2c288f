use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::auth::model::{Role, User};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,        // user id
    pub username: String,
    pub role: Role,
    pub is_verified: bool,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,        // user id
    pub exp: i64,
    pub iat: i64,
    pub jti: String,        // keeps every issued token string unique
}

/// Signs and verifies the two cookie-carried credentials.
///
/// Access and refresh tokens use separate secrets so that one can never be
/// presented in place of the other.
pub struct JwtService {
    access_secret: String,
    refresh_secret: String,
    access_token_duration: Duration,
    refresh_token_duration: Duration,
}

impl JwtService {
    pub fn new(access_secret: String, refresh_secret: String) -> Self {
        Self {
            access_secret,
            refresh_secret,
            access_token_duration: Duration::minutes(15),
            refresh_token_duration: Duration::days(7),
        }
    }

    pub fn with_access_token_duration(mut self, duration: Duration) -> Self {
        self.access_token_duration = duration;
        self
    }

    pub fn issue_access_token(&self, user: &User) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
            is_verified: user.is_verified,
            exp: (now + self.access_token_duration).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.access_secret.as_bytes()),
        )
    }

    pub fn issue_refresh_token(&self, user_id: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = RefreshClaims {
            sub: user_id.to_string(),
            exp: (now + self.refresh_token_duration).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.refresh_secret.as_bytes()),
        )
    }

    /// Decoded identity, or `None` when the token is expired, malformed or forged.
    pub fn verify_access_token(&self, token: &str) -> Option<AccessClaims> {
        decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(self.access_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .ok()
    }

    pub fn verify_refresh_token(&self, token: &str) -> Option<RefreshClaims> {
        decode::<RefreshClaims>(
            token,
            &DecodingKey::from_secret(self.refresh_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .ok()
    }

    pub fn access_token_duration(&self) -> Duration {
        self.access_token_duration
    }

    pub fn refresh_token_duration(&self) -> Duration {
        self.refresh_token_duration
    }
}
