/// Authorization module for post-service
///
/// Ownership is the only authorization rule: the author of a post is the only
/// user allowed to edit or delete it. Likes and comments are open to every
/// authenticated user.
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::Post;

/// Owner-only actions on a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerAction {
    Update,
    Delete,
}

impl OwnerAction {
    fn verb(self) -> &'static str {
        match self {
            OwnerAction::Update => "update",
            OwnerAction::Delete => "delete",
        }
    }
}

/// Fail with `Forbidden` unless `user_id` authored `post`.
pub fn assert_owner(post: &Post, user_id: Uuid, action: OwnerAction) -> Result<()> {
    if post.is_owned_by(user_id) {
        Ok(())
    } else {
        tracing::warn!(
            post_id = %post.id,
            %user_id,
            action = action.verb(),
            "non-owner attempted owner-only action"
        );
        Err(AppError::Forbidden(format!(
            "Not authorized to {} this post",
            action.verb()
        )))
    }
}
