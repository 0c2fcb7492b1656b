/// Database access layer
///
/// This module provides:
/// - `PostStore`: keyed storage for post aggregates with atomic read-modify-write
/// - `PgPostStore`: PostgreSQL implementation (likes and comments held as JSONB)
/// - `InMemoryPostStore`: process-local implementation for tests and local runs
/// - `PgIdentityResolver`: reads display identities from the shared users table
use crate::error::Result;
use crate::models::Post;
use async_trait::async_trait;
use uuid::Uuid;

pub mod memory;
pub mod post_repo;
pub mod user_repo;

pub use memory::InMemoryPostStore;
pub use post_repo::PgPostStore;
pub use user_repo::PgIdentityResolver;

/// Change applied to one post inside a store transaction. Returning an error
/// aborts the mutation and leaves the stored post untouched.
pub type PostMutation = Box<dyn FnOnce(&mut Post) -> Result<()> + Send>;

/// Precondition checked against the locked post before it is deleted.
pub type PostCheck = Box<dyn FnOnce(&Post) -> Result<()> + Send>;

/// Storage contract for post aggregates.
///
/// Implementations must serialize concurrent `mutate` calls on the same id so
/// that no update is lost.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Persist a new post and return its id.
    async fn create(&self, post: Post) -> Result<Uuid>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Post>>;

    /// Newest first, at most `limit` posts.
    async fn list_recent(&self, limit: usize) -> Result<Vec<Post>>;

    /// Atomically load, change and save one post. `Ok(None)` when the id does
    /// not resolve.
    async fn mutate(&self, id: Uuid, mutation: PostMutation) -> Result<Option<Post>>;

    /// Remove a post with its comments once `check` accepts it. The check and
    /// the removal are one atomic step. `Ok(false)` when the id does not resolve.
    async fn delete(&self, id: Uuid, check: PostCheck) -> Result<bool>;

    /// Connectivity check for readiness probes.
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
