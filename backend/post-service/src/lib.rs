/// Post Service Library
///
/// Handles posts, likes, and comments for the Nova social feed. A post owns
/// its likes and comments; every change to one of them is a single atomic
/// update of the post.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and routing
/// - `models`: Post aggregate, validated inputs, and response views
/// - `services`: Post service, feed assembly, identity population
/// - `db`: Post store contract with PostgreSQL and in-memory implementations
/// - `middleware`: JWT authentication, request timing, ownership checks
/// - `error`: Error types and HTTP mapping
/// - `config`: Configuration management
/// - `metrics`: Prometheus collectors
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
