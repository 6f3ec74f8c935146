/// Access Token Generation and Validation
///
/// Access tokens are self-contained HS256 JWTs; nothing is persisted
/// server-side. Validation pins the algorithm (defense against
/// algorithm-substitution attacks), pins the issuer, and uses zero leeway so
/// a token is rejected the moment its expiry passes.

use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::configuration::JwtSettings;
use crate::error::AuthError;

/// Generate a new access token for a user
///
/// The requested expiry (seconds) is always clamped to the configured
/// ceiling; a missing or non-positive request gets the full ceiling. Callers
/// cannot mint arbitrarily long-lived tokens.
///
/// # Errors
/// Returns `InvalidSignature` if token encoding fails
pub fn generate_access_token(
    user_id: &Uuid,
    requested_expiry: Option<i64>,
    config: &JwtSettings,
) -> Result<String, AuthError> {
    let ceiling = config.access_token_max_expiry;
    let expiry_seconds = match requested_expiry {
        Some(seconds) if seconds > 0 && seconds < ceiling => seconds,
        _ => ceiling,
    };

    let claims = Claims::new(*user_id, expiry_seconds, config.issuer.clone());

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidSignature)
}

/// Validate an access token and extract the user ID from its subject
///
/// # Errors
/// - `WrongAlgorithm` when the token's algorithm header is not HS256
/// - `TokenExpired` once the current time is at or past the expiry
/// - `InvalidSignature` for a bad signature, wrong issuer, or any otherwise
///   untrusted token
/// - `MalformedSubject` when the subject is not a valid UUID
pub fn validate_access_token(token: &str, config: &JwtSettings) -> Result<Uuid, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_issuer(&[&config.issuer]);
    validation.set_required_spec_claims(&["exp", "iss"]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::warn!("JWT validation error: {}", e);
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidAlgorithm => AuthError::WrongAlgorithm,
            _ => AuthError::InvalidSignature,
        }
    })?;

    data.claims.user_id()
}
