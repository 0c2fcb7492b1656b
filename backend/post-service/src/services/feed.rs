/// Feed assembly: newest posts first, capped, with author identities embedded.
use crate::db::PostStore;
use crate::error::Result;
use crate::metrics::posts::FEED_POSTS_RETURNED;
use crate::models::PostView;
use crate::services::identity::{populate_posts, IdentityResolver};
use std::sync::Arc;

/// Upper bound on posts returned by one feed request. Not client-configurable.
pub const FEED_LIMIT: usize = 100;

pub struct FeedAssembler {
    store: Arc<dyn PostStore>,
    identities: Arc<dyn IdentityResolver>,
}

impl FeedAssembler {
    pub fn new(store: Arc<dyn PostStore>, identities: Arc<dyn IdentityResolver>) -> Self {
        Self { store, identities }
    }

    pub async fn assemble(&self) -> Result<Vec<PostView>> {
        let posts = self.store.list_recent(FEED_LIMIT).await?;
        let views = populate_posts(self.identities.as_ref(), posts).await?;
        FEED_POSTS_RETURNED.observe(views.len() as f64);
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryPostStore;
    use crate::models::{NewPost, Post};
    use crate::services::identity::StaticIdentityResolver;
    use uuid::Uuid;

    #[tokio::test]
    async fn caps_the_feed() {
        let store = Arc::new(InMemoryPostStore::new());
        let author = Uuid::new_v4();
        for i in 0..(FEED_LIMIT + 5) {
            let content = format!("post {}", i);
            store
                .create(Post::new(author, NewPost::parse(Some(&content), None).unwrap()))
                .await
                .unwrap();
        }

        let feed = FeedAssembler::new(store, Arc::new(StaticIdentityResolver::default()));
        let views = feed.assemble().await.unwrap();

        assert_eq!(views.len(), FEED_LIMIT);
        assert_eq!(views[0].content, format!("post {}", FEED_LIMIT + 4));
    }
}
