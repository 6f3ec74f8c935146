/// JWT Claims structure
///
/// The payload of an access token: the standard registered claims the service
/// uses (RFC 7519), nothing more. Tokens carry only the subject; no email or
/// roles are embedded.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;

/// Fixed issuer label stamped into every access token
pub const TOKEN_ISSUER: &str = "chirpy";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Issuer
    pub iss: String,
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user, expiring `expiry_seconds` from now
    pub fn new(user_id: Uuid, expiry_seconds: i64, issuer: String) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            iss: issuer,
            sub: user_id.to_string(),
            iat: now,
            exp: now + expiry_seconds,
        }
    }

    /// Extract the user ID from the subject claim
    ///
    /// # Errors
    /// `MalformedSubject` if the subject is not a valid UUID
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::MalformedSubject)
    }
}
