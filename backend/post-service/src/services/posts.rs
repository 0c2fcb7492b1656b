/// Post service - the aggregate boundary for posts, likes and comments
///
/// Every change to an existing post goes through `PostStore::mutate` or
/// `PostStore::delete`, so the ownership check and the change it guards run
/// against the same locked snapshot.
use crate::db::PostStore;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::middleware::permissions::{assert_owner, OwnerAction};
use crate::models::{NewComment, NewPost, Post, PostEdit, PostView};
use crate::services::feed::FeedAssembler;
use crate::services::identity::{populate_post, IdentityResolver};
use std::sync::Arc;
use uuid::Uuid;

/// Result of a like toggle.
#[derive(Debug, Clone)]
pub struct LikeOutcome {
    pub post: PostView,
    /// `true` if the call added a like, `false` if it removed one.
    pub liked: bool,
}

pub struct PostService {
    store: Arc<dyn PostStore>,
    identities: Arc<dyn IdentityResolver>,
    feed: FeedAssembler,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>, identities: Arc<dyn IdentityResolver>) -> Self {
        Self {
            feed: FeedAssembler::new(store.clone(), identities.clone()),
            store,
            identities,
        }
    }

    async fn render(&self, post: Post) -> Result<PostView> {
        populate_post(self.identities.as_ref(), post).await
    }

    /// Newest posts first, at most `FEED_LIMIT`, identities embedded.
    pub async fn list_feed(&self, user_id: Uuid) -> Result<Vec<PostView>> {
        metrics::observe("list_feed", async move {
            let posts = self.feed.assemble().await?;
            tracing::debug!(%user_id, count = posts.len(), "feed assembled");
            Ok(posts)
        })
        .await
    }

    /// Create a post owned by `user_id`.
    pub async fn create_post(
        &self,
        user_id: Uuid,
        content: Option<&str>,
        image: Option<String>,
    ) -> Result<PostView> {
        metrics::observe("create_post", async move {
            let input = NewPost::parse(content, image)?;
            let post = Post::new(user_id, input);
            let post_id = self.store.create(post.clone()).await?;

            tracing::info!(%post_id, %user_id, "post created");
            self.render(post).await
        })
        .await
    }

    /// Owner-only edit of content and/or image.
    pub async fn update_post(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        content: Option<String>,
        image: Option<String>,
    ) -> Result<PostView> {
        metrics::observe("update_post", async move {
            let edit = PostEdit::parse(content, image)?;
            let post = self
                .store
                .mutate(
                    post_id,
                    Box::new(move |post: &mut Post| {
                        assert_owner(post, user_id, OwnerAction::Update)?;
                        post.apply_edit(edit);
                        Ok(())
                    }),
                )
                .await?
                .ok_or_else(AppError::post_not_found)?;

            tracing::info!(%post_id, %user_id, "post updated");
            self.render(post).await
        })
        .await
    }

    /// Owner-only removal of a post and its comments.
    pub async fn delete_post(&self, user_id: Uuid, post_id: Uuid) -> Result<()> {
        metrics::observe("delete_post", async move {
            let deleted = self
                .store
                .delete(
                    post_id,
                    Box::new(move |post: &Post| assert_owner(post, user_id, OwnerAction::Delete)),
                )
                .await?;
            if !deleted {
                return Err(AppError::post_not_found());
            }

            tracing::info!(%post_id, %user_id, "post deleted");
            Ok(())
        })
        .await
    }

    /// Like the post if `user_id` has not liked it yet, otherwise unlike it.
    pub async fn toggle_like(&self, user_id: Uuid, post_id: Uuid) -> Result<LikeOutcome> {
        metrics::observe("toggle_like", async move {
            let post = self
                .store
                .mutate(
                    post_id,
                    Box::new(move |post: &mut Post| {
                        post.toggle_like(user_id);
                        Ok(())
                    }),
                )
                .await?
                .ok_or_else(AppError::post_not_found)?;

            // The returned snapshot is the committed state of this mutation.
            let liked = post.is_liked_by(user_id);
            tracing::debug!(%post_id, %user_id, liked, "like toggled");

            Ok(LikeOutcome {
                post: self.render(post).await?,
                liked,
            })
        })
        .await
    }

    /// Append a comment by `user_id`.
    pub async fn add_comment(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        text: Option<&str>,
    ) -> Result<PostView> {
        metrics::observe("add_comment", async move {
            let input = NewComment::parse(text)?;
            let post = self
                .store
                .mutate(
                    post_id,
                    Box::new(move |post: &mut Post| {
                        post.push_comment(user_id, input);
                        Ok(())
                    }),
                )
                .await?
                .ok_or_else(AppError::post_not_found)?;

            tracing::info!(%post_id, %user_id, comments = post.comments.len(), "comment added");
            self.render(post).await
        })
        .await
    }

    /// Store connectivity, for readiness probes.
    pub async fn check_store(&self) -> Result<()> {
        self.store.ping().await
    }
}
