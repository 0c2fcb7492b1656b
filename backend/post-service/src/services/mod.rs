/// Business logic layer for post-service
///
/// - Post service: create, edit, delete, like and comment on posts
/// - Feed: newest-first listing with a fixed cap
/// - Identity: read-time embedding of author display identities
pub mod feed;
pub mod identity;
pub mod posts;

// Re-export commonly used services
pub use feed::{FeedAssembler, FEED_LIMIT};
pub use identity::{IdentityResolver, StaticIdentityResolver};
pub use posts::{LikeOutcome, PostService};
