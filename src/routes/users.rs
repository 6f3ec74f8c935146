/// User Routes
///
/// Account creation, authenticated profile updates, and the payment
/// provider's upgrade webhook.

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{bearer_token, hash_password, validate_access_token};
use crate::configuration::JwtSettings;
use crate::error::{AppError, DatabaseError};
use crate::validators::is_valid_email;

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub email: String,
    pub password: String,
}

/// User record as exposed over the API; the password hash never leaves the
/// server
#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
    pub is_chirpy_red: bool,
}

impl UserResponse {
    pub fn from_row(row: (Uuid, String, DateTime<Utc>, DateTime<Utc>, bool)) -> Self {
        Self {
            id: row.0,
            email: row.1,
            created_at: row.2.to_rfc3339(),
            updated_at: row.3.to_rfc3339(),
            is_chirpy_red: row.4,
        }
    }
}

#[derive(Deserialize)]
pub struct WebhookRequest {
    pub event: String,
    pub data: WebhookData,
}

#[derive(Deserialize)]
pub struct WebhookData {
    pub user_id: Uuid,
}

/// POST /api/users
///
/// Create an account from email and password.
///
/// # Errors
/// - 400: invalid email or password over the 72-byte limit
/// - 409: email already registered
pub async fn create_user(
    form: web::Json<CreateUserRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let email = is_valid_email(&form.email)?;
    let password_hash = hash_password(&form.password)?;

    let user_id = Uuid::new_v4();
    let now = Utc::now();
    let row = sqlx::query_as::<_, (Uuid, String, DateTime<Utc>, DateTime<Utc>, bool)>(
        r#"
        INSERT INTO users (id, email, password_hash, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, email, created_at, updated_at, is_chirpy_red
        "#,
    )
    .bind(user_id)
    .bind(&email)
    .bind(&password_hash)
    .bind(now)
    .bind(now)
    .fetch_one(pool.get_ref())
    .await?;

    tracing::info!(user_id = %user_id, "User created");

    Ok(HttpResponse::Created().json(UserResponse::from_row(row)))
}

/// PUT /api/users
///
/// Update the authenticated user's email and password.
///
/// # Errors
/// - 401: missing or invalid bearer token
/// - 400: invalid email or password over the 72-byte limit
/// - 409: new email already taken
pub async fn update_user(
    req: HttpRequest,
    form: web::Json<UpdateUserRequest>,
    pool: web::Data<PgPool>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let token = bearer_token(req.headers())?;
    let user_id = validate_access_token(&token, jwt_config.get_ref())?;

    let email = is_valid_email(&form.email)?;
    let password_hash = hash_password(&form.password)?;

    let row = sqlx::query_as::<_, (Uuid, String, DateTime<Utc>, DateTime<Utc>, bool)>(
        r#"
        UPDATE users
        SET email = $1, password_hash = $2, updated_at = $3
        WHERE id = $4
        RETURNING id, email, created_at, updated_at, is_chirpy_red
        "#,
    )
    .bind(&email)
    .bind(&password_hash)
    .bind(Utc::now())
    .bind(user_id)
    .fetch_one(pool.get_ref())
    .await?;

    tracing::info!(user_id = %user_id, "User updated");

    Ok(HttpResponse::Ok().json(UserResponse::from_row(row)))
}

/// POST /api/polka/webhooks
///
/// Payment provider callback. Only the `user.upgraded` event does anything;
/// every other event is acknowledged and dropped.
///
/// # Errors
/// - 404: user named in the event does not exist
pub async fn polka_webhooks(
    form: web::Json<WebhookRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    if form.event != "user.upgraded" {
        return Ok(HttpResponse::NoContent().finish());
    }

    let result = sqlx::query(
        r#"
        UPDATE users
        SET is_chirpy_red = true, updated_at = $1
        WHERE id = $2
        "#,
    )
    .bind(Utc::now())
    .bind(form.data.user_id)
    .execute(pool.get_ref())
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound("user not found".to_string()).into());
    }

    tracing::info!(user_id = %form.data.user_id, "User upgraded");

    Ok(HttpResponse::NoContent().finish())
}
