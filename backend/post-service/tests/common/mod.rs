//! Shared fixtures for post-service integration tests.
//!
//! Builds the real router over an in-memory post store and a fixed identity
//! table, and mints bearer tokens the way the authentication service does.
#![allow(dead_code)]

use actix_web::{dev::ServiceResponse, test, web, App};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use post_service::db::{InMemoryPostStore, PostStore};
use post_service::handlers;
use post_service::middleware::{Claims, JwtValidator};
use post_service::models::UserIdentity;
use post_service::services::{IdentityResolver, PostService, StaticIdentityResolver};
use std::sync::Arc;
use uuid::Uuid;

pub const JWT_SECRET: &str = "integration-test-secret";

pub fn user(name: &str) -> UserIdentity {
    UserIdentity {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        profile_image: format!("https://cdn.example.com/avatars/{}.png", name.to_lowercase()),
    }
}

pub fn token_for(user_id: Uuid) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + 3600,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("encode test token")
}

pub fn bearer(user_id: Uuid) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token_for(user_id)))
}

/// Everything a test needs to drive the service.
pub struct Harness {
    pub store: Arc<InMemoryPostStore>,
    pub service: web::Data<PostService>,
}

impl Harness {
    pub fn new(users: &[&UserIdentity]) -> Self {
        let resolver = StaticIdentityResolver::new(users.iter().map(|u| (*u).clone()));
        Self::with_parts(Arc::new(InMemoryPostStore::new()), Arc::new(resolver))
    }

    pub fn with_parts(
        store: Arc<InMemoryPostStore>,
        identities: Arc<dyn IdentityResolver>,
    ) -> Self {
        let service = PostService::new(store.clone() as Arc<dyn PostStore>, identities);
        Self {
            store,
            service: web::Data::new(service),
        }
    }
}

/// Build the full application for `service`.
pub async fn init_app(
    service: web::Data<PostService>,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(service)
            .app_data(web::Data::new(JwtValidator::from_secret(JWT_SECRET)))
            .configure(handlers::configure)
            .default_service(web::to(handlers::route_not_found)),
    )
    .await
}
