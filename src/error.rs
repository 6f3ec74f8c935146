/// Unified Error Handling Module
///
/// Every fallible operation in the application returns a specific error kind
/// from this module rather than a generic failure. The kinds map to HTTP
/// responses in one place so handlers stay thin.
///
/// Two conflations are deliberate security properties, not bugs:
/// - "unknown email" and "wrong password" surface the same message
/// - "unknown refresh token" and "revoked refresh token" surface the same message

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::error::Error as StdError;
use std::fmt;

/// Input validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    EmptyField(String),
    TooLong(String, usize),
    InvalidFormat(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField(field) => write!(f, "{} is empty", field),
            ValidationError::TooLong(field, max) => {
                write!(f, "{} is too long (maximum {} characters)", field, max)
            }
            ValidationError::InvalidFormat(msg) => write!(f, "{}", msg),
        }
    }
}

impl StdError for ValidationError {}

/// Authentication and authorization errors
///
/// Authentication failures (bad credentials, bad tokens) and authorization
/// failures (authenticated but not the owner) are distinct kinds even when a
/// handler maps them to the same status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Password exceeds bcrypt's 72-byte input limit
    PasswordTooLong,
    /// Stored hash is not a valid bcrypt hash
    MalformedHash,
    /// Wrong password, or the email does not exist
    IncorrectCredentials,
    /// Signature does not verify, or the token is otherwise untrusted
    InvalidSignature,
    /// Current time is at or past the token's expiry
    TokenExpired,
    /// Token's algorithm header is not the expected signing algorithm
    WrongAlgorithm,
    /// Token subject does not parse as a user id
    MalformedSubject,
    /// Refresh token unknown, revoked, or expired; one kind for all three
    TokenNotFoundOrRevoked,
    /// No Authorization header on the request
    MissingAuthHeader,
    /// Authorization header is not of the form `Bearer <token>`
    MalformedAuthHeader,
    /// Authenticated requester does not own the resource
    OperationNotAllowed,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::PasswordTooLong => write!(f, "password too long"),
            AuthError::MalformedHash => write!(f, "malformed password hash"),
            AuthError::IncorrectCredentials => write!(f, "incorrect email or password"),
            AuthError::InvalidSignature => write!(f, "invalid token"),
            AuthError::TokenExpired => write!(f, "token has expired"),
            AuthError::WrongAlgorithm => write!(f, "unexpected signing method"),
            AuthError::MalformedSubject => write!(f, "invalid user ID in token"),
            AuthError::TokenNotFoundOrRevoked => write!(f, "invalid refresh token"),
            AuthError::MissingAuthHeader => write!(f, "missing authorization header"),
            AuthError::MalformedAuthHeader => write!(f, "malformed authorization header"),
            AuthError::OperationNotAllowed => write!(f, "operation not allowed"),
        }
    }
}

impl StdError for AuthError {}

/// Database operation errors; store failures pass through opaque and are
/// surfaced as a generic server failure without leaking internal detail
#[derive(Debug)]
pub enum DatabaseError {
    UniqueConstraintViolation(String),
    NotFound(String),
    ConnectionPool(String),
    UnexpectedError(String),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseError::UniqueConstraintViolation(msg) => {
                write!(f, "Duplicate entry: {}", msg)
            }
            DatabaseError::NotFound(msg) => write!(f, "Not found: {}", msg),
            DatabaseError::ConnectionPool(msg) => write!(f, "Database connection error: {}", msg),
            DatabaseError::UnexpectedError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl StdError for DatabaseError {}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    MissingRequired(String),
    InvalidValue(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingRequired(msg) => write!(f, "Missing required config: {}", msg),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid config value: {}", msg),
        }
    }
}

impl StdError for ConfigError {}

/// Central error type that all application errors map to
#[derive(Debug)]
pub enum AppError {
    Validation(ValidationError),
    Auth(AuthError),
    Database(DatabaseError),
    Config(ConfigError),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Auth(e) => write!(f, "{}", e),
            AppError::Database(e) => write!(f, "{}", e),
            AppError::Config(e) => write!(f, "{}", e),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl StdError for AppError {}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        AppError::Database(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let error_msg = err.to_string();

        if error_msg.contains("duplicate key") || error_msg.contains("unique constraint") {
            AppError::Database(DatabaseError::UniqueConstraintViolation(
                "Email already registered".to_string(),
            ))
        } else if error_msg.contains("no rows") {
            AppError::Database(DatabaseError::NotFound("Record not found".to_string()))
        } else if error_msg.contains("pool") || error_msg.contains("connect") {
            AppError::Database(DatabaseError::ConnectionPool(error_msg))
        } else {
            AppError::Database(DatabaseError::UnexpectedError(error_msg))
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Human-readable error message
    pub error: String,
    /// Error code for client-side handling
    pub code: String,
    /// HTTP status code
    pub status: u16,
    /// Timestamp when error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_id: String, error: String, code: String, status: u16) -> Self {
        Self {
            error_id,
            error,
            code,
            status,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl AppError {
    fn response_parts(&self) -> (StatusCode, String, String) {
        match self {
            AppError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR".to_string(),
                e.to_string(),
            ),

            AppError::Auth(e) => match e {
                AuthError::PasswordTooLong => (
                    StatusCode::BAD_REQUEST,
                    "PASSWORD_TOO_LONG".to_string(),
                    e.to_string(),
                ),
                AuthError::IncorrectCredentials => (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_CREDENTIALS".to_string(),
                    e.to_string(),
                ),
                AuthError::InvalidSignature
                | AuthError::TokenExpired
                | AuthError::WrongAlgorithm
                | AuthError::MalformedSubject => (
                    StatusCode::UNAUTHORIZED,
                    "TOKEN_INVALID".to_string(),
                    "invalid token".to_string(),
                ),
                AuthError::TokenNotFoundOrRevoked => (
                    StatusCode::UNAUTHORIZED,
                    "REFRESH_TOKEN_INVALID".to_string(),
                    e.to_string(),
                ),
                AuthError::MissingAuthHeader | AuthError::MalformedAuthHeader => (
                    StatusCode::UNAUTHORIZED,
                    "MISSING_TOKEN".to_string(),
                    e.to_string(),
                ),
                AuthError::OperationNotAllowed => (
                    StatusCode::FORBIDDEN,
                    "FORBIDDEN".to_string(),
                    e.to_string(),
                ),
                AuthError::MalformedHash => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR".to_string(),
                    "Something went wrong".to_string(),
                ),
            },

            AppError::Database(e) => match e {
                DatabaseError::UniqueConstraintViolation(_) => (
                    StatusCode::CONFLICT,
                    "DUPLICATE_ENTRY".to_string(),
                    e.to_string(),
                ),
                DatabaseError::NotFound(_) => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND".to_string(),
                    e.to_string(),
                ),
                DatabaseError::ConnectionPool(_) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE".to_string(),
                    "Database service temporarily unavailable".to_string(),
                ),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR".to_string(),
                    "Something went wrong".to_string(),
                ),
            },

            AppError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR".to_string(),
                "Server configuration error".to_string(),
            ),

            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR".to_string(),
                "Something went wrong".to_string(),
            ),
        }
    }

    fn log(&self, request_id: &str) {
        match self {
            AppError::Validation(e) => {
                tracing::warn!(request_id = request_id, error = %e, "Validation error");
            }
            AppError::Auth(AuthError::IncorrectCredentials) => {
                tracing::warn!(request_id = request_id, "Invalid credentials attempt");
            }
            AppError::Auth(e) => {
                tracing::warn!(request_id = request_id, error = %e, "Authentication error");
            }
            AppError::Database(DatabaseError::UniqueConstraintViolation(_)) => {
                tracing::warn!(request_id = request_id, error = %self, "Duplicate entry attempt");
            }
            AppError::Database(e) => {
                tracing::error!(request_id = request_id, error = %e, "Database error");
            }
            AppError::Config(e) => {
                tracing::error!(request_id = request_id, error = %e, "Configuration error");
            }
            AppError::Internal(msg) => {
                tracing::error!(request_id = request_id, error = %msg, "Internal error");
            }
        }
    }
}

/// Actix-web integration: every `AppError` leaving a handler becomes a
/// structured JSON response and a structured log line
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let request_id = uuid::Uuid::new_v4().to_string();
        self.log(&request_id);

        let (status, code, message) = self.response_parts();
        let body = ErrorResponse::new(request_id, message, code, status.as_u16());

        HttpResponse::build(status).json(body)
    }

    fn status_code(&self) -> StatusCode {
        self.response_parts().0
    }
}
