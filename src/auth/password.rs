/// Password Hashing and Verification
///
/// Wraps bcrypt. The cost factor and salt are embedded in the produced hash,
/// so verification needs no side inputs. Hashing is deliberately expensive;
/// nothing here retries.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::AuthError;

/// bcrypt only consumes the first 72 bytes of input; longer passwords are
/// rejected instead of being silently truncated
const MAX_PASSWORD_BYTES: usize = 72;

/// Hash a password using bcrypt
///
/// # Errors
/// - `PasswordTooLong` when the input exceeds 72 bytes
/// - `MalformedHash` if bcrypt fails to produce a hash
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AuthError::PasswordTooLong);
    }

    hash(password, DEFAULT_COST).map_err(|_| AuthError::MalformedHash)
}

/// Verify a password against its stored hash
///
/// # Errors
/// - `IncorrectCredentials` on mismatch; the message does not reveal whether
///   the account exists
/// - `MalformedHash` when the stored string is not a valid bcrypt hash
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    match verify(password, hash) {
        Ok(true) => Ok(()),
        Ok(false) => Err(AuthError::IncorrectCredentials),
        Err(_) => Err(AuthError::MalformedHash),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let password = "correct horse battery staple";
        let hash = hash_password(password).expect("Failed to hash password");

        assert_ne!(password, hash);
        assert!(hash.starts_with("$2"));
        assert!(verify_password(password, &hash).is_ok());
    }

    #[test]
    fn wrong_password_fails_with_incorrect_credentials() {
        let hash = hash_password("correct-password").expect("Failed to hash password");

        let result = verify_password("wrong-password", &hash);
        assert_eq!(result, Err(AuthError::IncorrectCredentials));
    }

    #[test]
    fn empty_password_hashes_fine() {
        let hash = hash_password("").expect("Failed to hash empty password");
        assert!(verify_password("", &hash).is_ok());
        assert_eq!(
            verify_password("not-empty", &hash),
            Err(AuthError::IncorrectCredentials)
        );
    }

    #[test]
    fn password_at_72_bytes_is_accepted() {
        let password = "a".repeat(72);
        assert!(hash_password(&password).is_ok());
    }

    #[test]
    fn password_over_72_bytes_is_rejected() {
        let password = "a".repeat(73);
        assert_eq!(hash_password(&password), Err(AuthError::PasswordTooLong));
    }

    #[test]
    fn multibyte_password_limit_counts_bytes_not_chars() {
        // 25 three-byte characters = 75 bytes
        let password = "한".repeat(25);
        assert_eq!(hash_password(&password), Err(AuthError::PasswordTooLong));
    }

    #[test]
    fn garbage_stored_hash_fails_with_malformed_hash() {
        let result = verify_password("anything", "not-a-bcrypt-hash");
        assert_eq!(result, Err(AuthError::MalformedHash));
    }
}
