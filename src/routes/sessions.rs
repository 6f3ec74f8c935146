/// Session Routes
///
/// Login, access-token refresh, and refresh-token revocation.

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{
    bearer_token, generate_access_token, generate_refresh_token, resolve_refresh_token,
    revoke_refresh_token, save_refresh_token, verify_password,
};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};
use crate::routes::users::UserResponse;
use crate::validators::is_valid_email;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Optional requested access-token lifetime; always clamped server-side
    pub expires_in_seconds: Option<i64>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub token: String,
}

/// POST /api/login
///
/// Authenticate with email and password; answers with the user record, a
/// short-lived access token, and a freshly stored refresh token.
///
/// # Security Notes
/// "Email not found" and "wrong password" produce the same 401 message so
/// the endpoint cannot be used to enumerate accounts.
///
/// # Errors
/// - 400: malformed email
/// - 401: incorrect email or password
pub async fn login(
    form: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let email = is_valid_email(&form.email)?;

    let user = sqlx::query_as::<_, (Uuid, String, DateTime<Utc>, DateTime<Utc>, bool, String)>(
        r#"
        SELECT id, email, created_at, updated_at, is_chirpy_red, password_hash
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(&email)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or(AuthError::IncorrectCredentials)?;

    let (user_id, user_email, created_at, updated_at, is_chirpy_red, password_hash) = user;

    verify_password(&form.password, &password_hash)?;

    let access_token =
        generate_access_token(&user_id, form.expires_in_seconds, jwt_config.get_ref())?;

    let refresh_token = generate_refresh_token();
    save_refresh_token(
        pool.get_ref(),
        user_id,
        &refresh_token,
        jwt_config.refresh_token_expiry,
    )
    .await?;

    tracing::info!(user_id = %user_id, "User logged in");

    Ok(HttpResponse::Ok().json(LoginResponse {
        user: UserResponse::from_row((user_id, user_email, created_at, updated_at, is_chirpy_red)),
        token: access_token,
        refresh_token,
    }))
}

/// POST /api/refresh
///
/// Exchange a refresh token (from the Authorization header) for a new access
/// token.
///
/// # Errors
/// - 401: missing/malformed header, or the refresh token is unknown, revoked,
///   or expired (one indistinguishable failure)
pub async fn refresh(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let refresh_token = bearer_token(req.headers())?;

    let user_id = resolve_refresh_token(pool.get_ref(), &refresh_token).await?;
    let access_token = generate_access_token(&user_id, None, jwt_config.get_ref())?;

    tracing::info!(user_id = %user_id, "Access token refreshed");

    Ok(HttpResponse::Ok().json(RefreshResponse {
        token: access_token,
    }))
}

/// POST /api/revoke
///
/// Revoke the refresh token presented in the Authorization header.
/// Revoking an unknown or already-revoked token still answers 204.
///
/// # Errors
/// - 401: missing or malformed Authorization header
pub async fn revoke(req: HttpRequest, pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let refresh_token = bearer_token(req.headers())?;

    revoke_refresh_token(pool.get_ref(), &refresh_token).await?;

    Ok(HttpResponse::NoContent().finish())
}
