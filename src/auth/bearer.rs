/// Bearer Token Extraction
///
/// Pulls the credential out of an `Authorization: Bearer <token>` header.
/// A missing header and a malformed one are distinct failure kinds so
/// handlers can log them apart, even when both map to 401.

use actix_web::http::header::HeaderMap;

use crate::error::AuthError;

/// Extract the bearer token from a request's headers
///
/// # Errors
/// - `MissingAuthHeader` when no `Authorization` header is present
/// - `MalformedAuthHeader` when the value is not `Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    let header = headers
        .get("Authorization")
        .ok_or(AuthError::MissingAuthHeader)?;

    let value = header.to_str().map_err(|_| AuthError::MalformedAuthHeader)?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedAuthHeader)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MalformedAuthHeader);
    }

    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{HeaderName, HeaderValue};

    fn headers_with_authorization(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(value).unwrap(),
        );
        headers
    }

    #[test]
    fn extracts_the_token_after_the_scheme() {
        let headers = headers_with_authorization("Bearer my-token-value");
        assert_eq!(bearer_token(&headers).unwrap(), "my-token-value");
    }

    #[test]
    fn missing_header_is_its_own_failure_kind() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), Err(AuthError::MissingAuthHeader));
    }

    #[test]
    fn wrong_scheme_is_malformed() {
        let headers = headers_with_authorization("Basic dXNlcjpwYXNz");
        assert_eq!(bearer_token(&headers), Err(AuthError::MalformedAuthHeader));
    }

    #[test]
    fn bare_scheme_with_no_token_is_malformed() {
        let headers = headers_with_authorization("Bearer ");
        assert_eq!(bearer_token(&headers), Err(AuthError::MalformedAuthHeader));
    }
}
