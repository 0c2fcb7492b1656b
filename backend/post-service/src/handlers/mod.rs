/// HTTP handlers and routing for post-service
///
/// - Posts: feed, create, update, delete, like toggle, comments (authenticated)
/// - Health: summary, readiness, liveness
/// - Service banner at `/` and a JSON 404 for unknown routes
pub mod health;
pub mod posts;

pub use posts::{add_comment, create_post, delete_post, list_posts, toggle_like, update_post};

use crate::error::AppError;
use crate::metrics;
use crate::middleware::{JwtAuthMiddleware, MetricsMiddleware};
use actix_web::{web, HttpResponse};

/// Register every route of the service.
///
/// Expects `web::Data<PostService>` and `web::Data<JwtValidator>` to be
/// registered on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .route("/", web::get().to(root))
        .route("/metrics", web::get().to(metrics::serve_metrics))
        .route("/api/health", web::get().to(health::health_summary))
        .route("/api/health/ready", web::get().to(health::readiness_summary))
        .route("/api/health/live", web::get().to(health::liveness_check))
        .service(
            web::scope("/api/posts")
                .wrap(JwtAuthMiddleware)
                .wrap(MetricsMiddleware)
                .service(
                    web::resource("")
                        .route(web::get().to(list_posts))
                        .route(web::post().to(create_post))
                        .default_service(web::to(route_not_found)),
                )
                .service(
                    web::resource("/{post_id}")
                        .route(web::put().to(update_post))
                        .route(web::delete().to(delete_post))
                        .default_service(web::to(route_not_found)),
                )
                .service(
                    web::resource("/{post_id}/like")
                        .route(web::post().to(toggle_like))
                        .default_service(web::to(route_not_found)),
                )
                .service(
                    web::resource("/{post_id}/comment")
                        .route(web::post().to(add_comment))
                        .default_service(web::to(route_not_found)),
                ),
        );
}

/// Malformed JSON bodies become validation errors with the standard body.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!("rejected request body: {}", err);
        AppError::Validation("Invalid request body".to_string()).into()
    })
}

/// A post id that is not a UUID cannot name an existing post.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|_err, _req| AppError::post_not_found().into())
}

/// GET /
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Post service API is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Fallback for unknown routes and unsupported methods; register with
/// `App::default_service`.
pub async fn route_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "success": false,
        "message": "Route not found",
    }))
}
