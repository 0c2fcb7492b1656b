use crate::error::Result;
use crate::models::UserIdentity;
use crate::services::identity::IdentityResolver;
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Resolves display identities from the `users` table owned by the
/// authentication service. Read-only.
#[derive(Clone)]
pub struct PgIdentityResolver {
    pool: PgPool,
}

impl PgIdentityResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityResolver for PgIdentityResolver {
    async fn resolve(&self, user_ids: &[Uuid]) -> Result<HashMap<Uuid, UserIdentity>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, (Uuid, String, String, String)>(
            r#"
            SELECT id, name, email, COALESCE(profile_image, '') AS profile_image
            FROM users
            WHERE id = ANY($1)
            "#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, email, profile_image)| {
                (
                    id,
                    UserIdentity {
                        id,
                        name,
                        email,
                        profile_image,
                    },
                )
            })
            .collect())
    }
}
