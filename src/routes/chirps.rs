/// Chirp Routes
///
/// Posting, listing, fetching, validating, and deleting chirps. Posting
/// requires a valid access token; deletion additionally requires ownership.

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{authorize, bearer_token, validate_access_token};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError, DatabaseError, ValidationError};
use crate::profanity::remove_profanity;

const MAX_CHIRP_LENGTH: usize = 140;

#[derive(Deserialize)]
pub struct ChirpRequest {
    pub body: String,
}

#[derive(Serialize)]
pub struct ChirpResponse {
    pub id: Uuid,
    pub created_at: String,
    pub updated_at: String,
    pub body: String,
    pub user_id: Uuid,
}

type ChirpRow = (Uuid, DateTime<Utc>, DateTime<Utc>, String, Uuid);

impl ChirpResponse {
    fn from_row(row: ChirpRow) -> Self {
        Self {
            id: row.0,
            created_at: row.1.to_rfc3339(),
            updated_at: row.2.to_rfc3339(),
            body: row.3,
            user_id: row.4,
        }
    }
}

#[derive(Serialize)]
pub struct ValidateChirpResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleaned_body: Option<String>,
}

#[derive(Deserialize)]
pub struct ChirpsQuery {
    pub author_id: Option<Uuid>,
    pub sort: Option<String>,
}

fn check_length(body: &str) -> Result<(), ValidationError> {
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ValidationError::InvalidFormat("Chirp is too long".to_string()));
    }
    Ok(())
}

/// POST /api/validate_chirp
///
/// Standalone validation: answers `{"valid": true}` for a clean body or
/// `{"cleaned_body": ...}` when profanity was replaced.
///
/// # Errors
/// - 400: body over 140 characters
pub async fn validate_chirp(
    form: web::Json<ChirpRequest>,
) -> Result<HttpResponse, AppError> {
    check_length(&form.body)?;

    let (cleaned_body, cleaned) = remove_profanity(&form.body);
    let response = if cleaned {
        ValidateChirpResponse {
            valid: None,
            cleaned_body: Some(cleaned_body),
        }
    } else {
        ValidateChirpResponse {
            valid: Some(true),
            cleaned_body: None,
        }
    };

    Ok(HttpResponse::Ok().json(response))
}

/// POST /api/chirps
///
/// Post a chirp as the authenticated user. The body is length-checked and
/// profanity-filtered before storage.
///
/// # Errors
/// - 401: missing or invalid bearer token
/// - 400: body over 140 characters
pub async fn create_chirp(
    req: HttpRequest,
    form: web::Json<ChirpRequest>,
    pool: web::Data<PgPool>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let token = bearer_token(req.headers())?;
    let user_id = validate_access_token(&token, jwt_config.get_ref())?;

    check_length(&form.body)?;
    let (body, _) = remove_profanity(&form.body);

    let now = Utc::now();
    let row = sqlx::query_as::<_, ChirpRow>(
        r#"
        INSERT INTO chirps (id, created_at, updated_at, body, user_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, created_at, updated_at, body, user_id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(now)
    .bind(now)
    .bind(&body)
    .bind(user_id)
    .fetch_one(pool.get_ref())
    .await?;

    tracing::info!(user_id = %user_id, chirp_id = %row.0, "Chirp created");

    Ok(HttpResponse::Created().json(ChirpResponse::from_row(row)))
}

/// GET /api/chirps
///
/// List chirps, oldest first. Supports `?author_id=<uuid>` filtering and
/// `?sort=desc` for newest first.
pub async fn get_chirps(
    query: web::Query<ChirpsQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let rows = match query.author_id {
        Some(author_id) => {
            sqlx::query_as::<_, ChirpRow>(
                r#"
                SELECT id, created_at, updated_at, body, user_id
                FROM chirps
                WHERE user_id = $1
                ORDER BY created_at ASC
                "#,
            )
            .bind(author_id)
            .fetch_all(pool.get_ref())
            .await?
        }
        None => {
            sqlx::query_as::<_, ChirpRow>(
                r#"
                SELECT id, created_at, updated_at, body, user_id
                FROM chirps
                ORDER BY created_at ASC
                "#,
            )
            .fetch_all(pool.get_ref())
            .await?
        }
    };

    let mut chirps: Vec<ChirpResponse> = rows.into_iter().map(ChirpResponse::from_row).collect();
    if query.sort.as_deref() == Some("desc") {
        chirps.reverse();
    }

    Ok(HttpResponse::Ok().json(chirps))
}

/// GET /api/chirps/{id}
///
/// # Errors
/// - 404: no chirp with that id
pub async fn get_chirp_by_id(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = path.into_inner();

    let row = sqlx::query_as::<_, ChirpRow>(
        r#"
        SELECT id, created_at, updated_at, body, user_id
        FROM chirps
        WHERE id = $1
        "#,
    )
    .bind(chirp_id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| DatabaseError::NotFound("No chirp found".to_string()))?;

    Ok(HttpResponse::Ok().json(ChirpResponse::from_row(row)))
}

/// DELETE /api/chirps/{id}
///
/// Author-only. On this path authentication failures are surfaced as 403
/// like authorization failures, so a caller probing with a bad token learns
/// nothing about the chirp; a missing chirp is still 404.
///
/// # Errors
/// - 403: bad/missing token, or requester is not the author
/// - 404: no chirp with that id
pub async fn delete_chirp(
    req: HttpRequest,
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let token = bearer_token(req.headers()).map_err(|_| AuthError::OperationNotAllowed)?;
    let user_id = validate_access_token(&token, jwt_config.get_ref())
        .map_err(|_| AuthError::OperationNotAllowed)?;

    let chirp_id = path.into_inner();
    let row = sqlx::query_as::<_, (Uuid, Uuid)>(
        r#"
        SELECT id, user_id
        FROM chirps
        WHERE id = $1
        "#,
    )
    .bind(chirp_id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| DatabaseError::NotFound("No chirp found".to_string()))?;

    authorize(row.1, user_id)?;

    sqlx::query("DELETE FROM chirps WHERE id = $1")
        .bind(chirp_id)
        .execute(pool.get_ref())
        .await?;

    tracing::info!(user_id = %user_id, chirp_id = %chirp_id, "Chirp deleted");

    Ok(HttpResponse::NoContent().finish())
}
