use chrono::{Duration, Utc};
use dapur_core::User;
use thiserror::Error;
use uuid::Uuid;

use super::crypto::{generate_token, hash_token};
use crate::store::{StoreError, UserStore};

pub const SESSION_LIFETIME_DAYS: i64 = 30;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to generate session token: {0}")]
    Token(#[from] rand::rand_core::OsError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Open a session for `user_id` and return the plaintext bearer token. Only
/// the token's hash is stored.
pub async fn create_session(users: &dyn UserStore, user_id: Uuid) -> Result<String, SessionError> {
    let token = generate_token()?;
    let token_hash = hash_token(&token);
    let expires_at = Utc::now() + Duration::days(SESSION_LIFETIME_DAYS);

    users
        .create_session(user_id, &token_hash, expires_at)
        .await?;

    Ok(token)
}

pub async fn user_from_token(users: &dyn UserStore, token: &str) -> Result<Option<User>, StoreError> {
    users.user_for_token_hash(&hash_token(token)).await
}
