/// Ownership Authorization
///
/// Runs after token validation has already established who the requester is.
/// Kept as a pure function so the allow/deny decision is testable without a
/// request in flight.

use uuid::Uuid;

use crate::error::AuthError;

/// Allow the operation iff the requester owns the resource
///
/// # Errors
/// `OperationNotAllowed` for any requester other than the owner. This is an
/// authorization failure, distinct from the authentication failures raised
/// during token validation.
pub fn authorize(resource_owner: Uuid, requester: Uuid) -> Result<(), AuthError> {
    if resource_owner == requester {
        Ok(())
    } else {
        Err(AuthError::OperationNotAllowed)
    }
}
