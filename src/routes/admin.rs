/// Admin Routes
///
/// Fileserver metrics page and the development-only environment reset.

use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::configuration::Platform;
use crate::error::{AppError, AuthError};
use crate::metrics::FileserverMetrics;

/// GET /admin/metrics
pub async fn metrics(metrics: web::Data<FileserverMetrics>) -> HttpResponse {
    let body = format!(
        r#"<html>
  <body>
    <h1>Welcome, Chirpy Admin</h1>
    <p>Chirpy has been visited {} times!</p>
  </body>
</html>
"#,
        metrics.hits()
    );

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// POST /admin/reset
///
/// Destructive: zeroes the hit counter and truncates users (cascading to
/// chirps and refresh tokens). Only allowed when the platform is `dev`.
///
/// # Errors
/// - 403: platform is not `dev`
pub async fn reset(
    metrics: web::Data<FileserverMetrics>,
    platform: web::Data<Platform>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    if !platform.allows_reset() {
        return Err(AuthError::OperationNotAllowed.into());
    }

    metrics.reset();

    sqlx::query("TRUNCATE TABLE users CASCADE")
        .execute(pool.get_ref())
        .await?;

    tracing::warn!("Environment reset: users truncated, metrics zeroed");

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("OK"))
}
