/// Refresh Token Management
///
/// Refresh tokens are opaque, long-lived, and persisted so they can be
/// revoked. Properties:
/// - 32 cryptographically random bytes, hex-encoded (64 chars)
/// - Hashed with SHA-256 before storage; plaintext never touches the database
/// - Revocation marks `revoked_at`; rows are never deleted
/// - Resolution fails identically for unknown, revoked, and expired tokens

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AuthError};

const TOKEN_BYTES: usize = 32;

/// Generate a new cryptographically secure refresh token
///
/// The plaintext is what the client stores; the server keeps only a digest.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Digest a refresh token for storage and lookup
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Persist a refresh token for a user
///
/// # Errors
/// Store failures pass through as `AppError::Database`
pub async fn save_refresh_token(
    pool: &PgPool,
    user_id: Uuid,
    token: &str,
    expiry_seconds: i64,
) -> Result<(), AppError> {
    let token_hash = hash_token(token);
    let expires_at = Utc::now() + Duration::seconds(expiry_seconds);

    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(token_hash)
    .bind(expires_at)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

/// Resolve a refresh token to its owning user
///
/// # Errors
/// `TokenNotFoundOrRevoked` whether the token never existed, was revoked, or
/// has expired; callers cannot distinguish the three
pub async fn resolve_refresh_token(pool: &PgPool, token: &str) -> Result<Uuid, AppError> {
    let token_hash = hash_token(token);

    let row = sqlx::query_as::<_, (Uuid, DateTime<Utc>, Option<DateTime<Utc>>)>(
        r#"
        SELECT user_id, expires_at, revoked_at
        FROM refresh_tokens
        WHERE token_hash = $1
        "#,
    )
    .bind(&token_hash)
    .fetch_optional(pool)
    .await?;

    match row {
        None => {
            tracing::warn!("Refresh token not found");
            Err(AuthError::TokenNotFoundOrRevoked.into())
        }
        Some((user_id, _, Some(_))) => {
            tracing::warn!(user_id = %user_id, "Attempt to use revoked refresh token");
            Err(AuthError::TokenNotFoundOrRevoked.into())
        }
        Some((user_id, expires_at, None)) if expires_at <= Utc::now() => {
            tracing::info!(user_id = %user_id, "Refresh token expired");
            Err(AuthError::TokenNotFoundOrRevoked.into())
        }
        Some((user_id, _, None)) => Ok(user_id),
    }
}

/// Revoke a refresh token
///
/// Idempotent: revoking an already-revoked or unknown token succeeds and
/// leaves any existing `revoked_at` untouched.
///
/// # Errors
/// Store failures pass through as `AppError::Database`
pub async fn revoke_refresh_token(pool: &PgPool, token: &str) -> Result<(), AppError> {
    let token_hash = hash_token(token);

    sqlx::query(
        r#"
        UPDATE refresh_tokens
        SET revoked_at = $1
        WHERE token_hash = $2 AND revoked_at IS NULL
        "#,
    )
    .bind(Utc::now())
    .bind(token_hash)
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_token_is_64_hex_chars() {
        let token = generate_refresh_token();

        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generated_tokens_do_not_collide() {
        let token1 = generate_refresh_token();
        let token2 = generate_refresh_token();

        assert_ne!(token1, token2);
    }

    #[test]
    fn token_digest_is_stable_and_not_the_plaintext() {
        let token = generate_refresh_token();
        let hash1 = hash_token(&token);
        let hash2 = hash_token(&token);

        assert_eq!(hash1, hash2);
        assert_ne!(token, hash1);
        // SHA-256 hex
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn different_tokens_have_different_digests() {
        let hash1 = hash_token(&generate_refresh_token());
        let hash2 = hash_token(&generate_refresh_token());

        assert_ne!(hash1, hash2);
    }
}
