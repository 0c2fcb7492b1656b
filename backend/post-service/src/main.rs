use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use post_service::config::LogFormat;
use post_service::db::{PgIdentityResolver, PgPostStore, PostStore};
use post_service::handlers;
use post_service::middleware::JwtValidator;
use post_service::services::{IdentityResolver, PostService};
use sqlx::postgres::PgPoolOptions;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Post Service
///
/// Serves the social feed: posts, likes, and comments.
///
/// # Routes
///
/// - `GET|POST /api/posts` - Feed listing and post creation
/// - `PUT|DELETE /api/posts/{id}` - Owner edits and deletion
/// - `POST /api/posts/{id}/like` - Like toggle
/// - `POST /api/posts/{id}/comment` - Comments
/// - `/api/health*`, `/metrics` - Probes and Prometheus exposition
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        // A missing .env file is normal outside local development.
        if !e.not_found() {
            eprintln!("WARN: failed to read .env file: {}", e);
        }
    }

    // Load configuration
    let config = match post_service::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.logging.format);

    tracing::info!("Starting post-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&config.database.url)
        .await
        .map_err(|e| {
            tracing::error!("Database connection failed: {}", e);
            io::Error::new(io::ErrorKind::Other, format!("Database connection failed: {e}"))
        })?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|e| {
            tracing::error!("Database migration failed: {}", e);
            io::Error::new(io::ErrorKind::Other, format!("Database migration failed: {e}"))
        })?;

    tracing::info!("Connected to database");

    let store: Arc<dyn PostStore> = Arc::new(PgPostStore::new(db_pool.clone()));
    let identities: Arc<dyn IdentityResolver> = Arc::new(PgIdentityResolver::new(db_pool));
    let post_service = web::Data::new(PostService::new(store, identities));
    let jwt_validator = web::Data::new(JwtValidator::from_secret(&config.auth.jwt_secret));

    let http_bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", http_bind_address);

    let cors_config = config.cors.clone();
    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in cors_config.origins() {
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(post_service.clone())
            .app_data(jwt_validator.clone())
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(handlers::configure)
            .default_service(web::to(handlers::route_not_found))
    })
    .bind(&http_bind_address)?
    .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    shutdown_signal().await;
    tracing::info!("Shutdown signal received");
    server_handle.stop(true).await;

    match server_task.await {
        Ok(result) => result?,
        Err(e) => {
            tracing::error!("Server task join error: {}", e);
            return Err(io::Error::new(io::ErrorKind::Other, e.to_string()));
        }
    }

    tracing::info!("Post-service shut down");
    Ok(())
}
