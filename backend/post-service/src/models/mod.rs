/// Data models for post-service
///
/// - `Post`: the aggregate root, owning its likes and comments
/// - `Comment`: embedded in a post, no identity outside its parent
/// - `NewPost` / `PostEdit` / `NewComment`: validated inputs
/// - `PostView` / `CommentView` / `AuthorView`: response shapes with embedded identities
use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;
use validator::Validate;

/// Maximum post content length, in characters.
pub const MAX_CONTENT_CHARS: usize = 5000;
/// Maximum comment text length, in characters.
pub const MAX_COMMENT_CHARS: usize = 500;

/// Comment embedded in a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Post aggregate.
///
/// `likes` and `comments` are only changed through the methods below, which
/// the service invokes inside a single store mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub image: String,
    pub likes: BTreeSet<Uuid>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Build a fresh post owned by `user_id`.
    pub fn new(user_id: Uuid, input: NewPost) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            content: input.content,
            image: input.image,
            likes: BTreeSet::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    pub fn is_liked_by(&self, user_id: Uuid) -> bool {
        self.likes.contains(&user_id)
    }

    /// Apply an owner edit. Absent fields keep their stored value.
    pub fn apply_edit(&mut self, edit: PostEdit) {
        if let Some(content) = edit.content {
            self.content = content;
        }
        if let Some(image) = edit.image {
            self.image = image;
        }
        self.touch();
    }

    /// Flip `user_id`'s membership in `likes`. Returns `true` when the call
    /// added a like and `false` when it removed one.
    pub fn toggle_like(&mut self, user_id: Uuid) -> bool {
        let liked = if self.likes.remove(&user_id) {
            false
        } else {
            self.likes.insert(user_id);
            true
        };
        self.touch();
        liked
    }

    /// Append a comment. `created_at` never goes backwards relative to the
    /// previous comment, even if the wall clock does.
    pub fn push_comment(&mut self, user_id: Uuid, input: NewComment) -> &Comment {
        let mut created_at = Utc::now();
        if let Some(last) = self.comments.last() {
            created_at = created_at.max(last.created_at);
        }

        self.comments.push(Comment {
            id: Uuid::new_v4(),
            user_id,
            text: input.text,
            created_at,
        });
        self.touch();

        // just pushed
        &self.comments[self.comments.len() - 1]
    }

    /// Distinct author ids referenced by this post and its comments.
    pub fn author_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        std::iter::once(self.user_id).chain(self.comments.iter().map(|c| c.user_id))
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }
}

/// Validated input for post creation.
#[derive(Debug, Clone, Validate)]
pub struct NewPost {
    #[validate(length(max = 5000, message = "Post content cannot exceed 5000 characters"))]
    pub content: String,
    pub image: String,
}

impl NewPost {
    /// Trim and validate raw create input. `image` defaults to empty.
    pub fn parse(content: Option<&str>, image: Option<String>) -> Result<Self> {
        let content = content.map(str::trim).unwrap_or_default();
        if content.is_empty() {
            return Err(AppError::Validation("Post content is required".to_string()));
        }

        let input = Self {
            content: content.to_string(),
            image: image.unwrap_or_default(),
        };
        input.validate()?;
        Ok(input)
    }
}

/// Owner edit of a post.
///
/// Content is applied verbatim: unlike creation it is neither trimmed nor
/// checked for blankness. An empty string counts as "not provided".
#[derive(Debug, Clone, Default, Validate)]
pub struct PostEdit {
    #[validate(length(max = 5000, message = "Post content cannot exceed 5000 characters"))]
    pub content: Option<String>,
    pub image: Option<String>,
}

impl PostEdit {
    pub fn parse(content: Option<String>, image: Option<String>) -> Result<Self> {
        let edit = Self {
            content: content.filter(|c| !c.is_empty()),
            image,
        };
        edit.validate()?;
        Ok(edit)
    }
}

/// Validated input for a new comment.
#[derive(Debug, Clone, Validate)]
pub struct NewComment {
    #[validate(length(max = 500, message = "Comment text cannot exceed 500 characters"))]
    pub text: String,
}

impl NewComment {
    pub fn parse(text: Option<&str>) -> Result<Self> {
        let text = text.map(str::trim).unwrap_or_default();
        if text.is_empty() {
            return Err(AppError::Validation("Comment text is required".to_string()));
        }

        let input = Self {
            text: text.to_string(),
        };
        input.validate()?;
        Ok(input)
    }
}

/// Display identity of a user, as supplied by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub profile_image: String,
}

/// Author snapshot embedded in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub profile_image: String,
}

impl AuthorView {
    /// Post authors carry their email.
    pub fn post_author(identity: &UserIdentity) -> Self {
        Self {
            id: identity.id,
            name: identity.name.clone(),
            email: Some(identity.email.clone()),
            profile_image: identity.profile_image.clone(),
        }
    }

    /// Comment authors are rendered without email.
    pub fn comment_author(identity: &UserIdentity) -> Self {
        Self {
            id: identity.id,
            name: identity.name.clone(),
            email: None,
            profile_image: identity.profile_image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: Option<AuthorView>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: Option<AuthorView>,
    pub content: String,
    pub image: String,
    pub likes: Vec<Uuid>,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> Post {
        Post::new(
            Uuid::new_v4(),
            NewPost::parse(Some("Hello world"), None).unwrap(),
        )
    }

    #[test]
    fn new_post_trims_and_defaults_image() {
        let input = NewPost::parse(Some("  Hello world \n"), None).unwrap();
        assert_eq!(input.content, "Hello world");
        assert_eq!(input.image, "");
    }

    #[test]
    fn new_post_rejects_blank_content() {
        for raw in [None, Some(""), Some("   \t\n")] {
            let err = NewPost::parse(raw, None).unwrap_err();
            assert_eq!(err.to_string(), "Post content is required");
        }
    }

    #[test]
    fn new_post_bounds_length_in_characters() {
        let at_limit = "é".repeat(MAX_CONTENT_CHARS);
        assert!(NewPost::parse(Some(&at_limit), None).is_ok());

        let over = "a".repeat(MAX_CONTENT_CHARS + 1);
        let err = NewPost::parse(Some(&over), None).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn comment_rejects_whitespace_and_overlong_text() {
        assert!(matches!(
            NewComment::parse(Some("  ")),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            NewComment::parse(Some(&"x".repeat(MAX_COMMENT_CHARS + 1))),
            Err(AppError::Validation(_))
        ));
        assert_eq!(NewComment::parse(Some(" Nice! ")).unwrap().text, "Nice!");
    }

    #[test]
    fn edit_applies_whitespace_content_verbatim() {
        let mut post = post();
        post.apply_edit(PostEdit::parse(Some("   ".into()), None).unwrap());
        assert_eq!(post.content, "   ");
        assert_eq!(post.image, "");
    }

    #[test]
    fn edit_with_empty_content_keeps_stored_value() {
        let mut post = post();
        post.apply_edit(PostEdit::parse(Some(String::new()), Some(String::new())).unwrap());
        assert_eq!(post.content, "Hello world");
        assert_eq!(post.image, "");
    }

    #[test]
    fn toggle_like_alternates_membership() {
        let mut post = post();
        let liker = Uuid::new_v4();

        assert!(post.toggle_like(liker));
        assert!(post.is_liked_by(liker));
        assert!(!post.toggle_like(liker));
        assert!(post.likes.is_empty());
    }

    #[test]
    fn comments_keep_append_order() {
        let mut post = post();
        let author = Uuid::new_v4();
        for text in ["first", "second", "third"] {
            post.push_comment(author, NewComment::parse(Some(text)).unwrap());
        }

        let texts: Vec<_> = post.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["first", "second", "third"]);
        assert!(post
            .comments
            .windows(2)
            .all(|w| w[0].created_at <= w[1].created_at));
        assert!(post.updated_at >= post.created_at);
    }
}
