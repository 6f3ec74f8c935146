use actix_files as fs;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::PgPool;
use std::net::TcpListener;
use std::sync::Arc;

use crate::configuration::Settings;
use crate::logger::LoggerMiddleware;
use crate::metrics::{FileserverMetrics, MetricsMiddleware};
use crate::routes::{
    create_chirp, create_user, delete_chirp, get_chirp_by_id, get_chirps, health_check, login,
    metrics, polka_webhooks, refresh, reset, revoke, update_user, validate_chirp,
};

pub fn run(
    listener: TcpListener,
    connection: PgPool,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let connection = web::Data::new(connection);
    let jwt_config = web::Data::new(settings.jwt.clone());
    let platform = web::Data::new(settings.application.platform);
    let fileserver_metrics = Arc::new(FileserverMetrics::new());
    let metrics_data = web::Data::from(fileserver_metrics.clone());

    let server = HttpServer::new(move || {
        App::new()
            .wrap(LoggerMiddleware)

            // Shared state
            .app_data(connection.clone())
            .app_data(jwt_config.clone())
            .app_data(platform.clone())
            .app_data(metrics_data.clone())

            // Public API
            .route("/api/healthz", web::get().to(health_check))
            .route("/api/validate_chirp", web::post().to(validate_chirp))
            .route("/api/users", web::post().to(create_user))
            .route("/api/login", web::post().to(login))
            .route("/api/refresh", web::post().to(refresh))
            .route("/api/revoke", web::post().to(revoke))
            .route("/api/chirps", web::get().to(get_chirps))
            .route("/api/chirps/{id}", web::get().to(get_chirp_by_id))
            .route("/api/polka/webhooks", web::post().to(polka_webhooks))

            // Bearer-authenticated API (tokens checked per-handler)
            .route("/api/users", web::put().to(update_user))
            .route("/api/chirps", web::post().to(create_chirp))
            .route("/api/chirps/{id}", web::delete().to(delete_chirp))

            // Admin surface
            .route("/admin/metrics", web::get().to(metrics))
            .route("/admin/reset", web::post().to(reset))

            // Static fileserver with hit counting (must be last to not
            // override API routes)
            .service(
                web::scope("/app")
                    .wrap(MetricsMiddleware::new(fileserver_metrics.clone()))
                    .service(fs::Files::new("/", "./public").index_file("index.html")),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
