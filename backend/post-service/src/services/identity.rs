/// Identity population
///
/// Author identities are never stored with a post. Each response resolves the
/// distinct author ids of the page in one batch call and embeds the result.
use crate::error::Result;
use crate::models::{AuthorView, CommentView, Post, PostView, UserIdentity};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Source of user display identities.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve the given ids. Unknown ids are simply absent from the map.
    async fn resolve(&self, user_ids: &[Uuid]) -> Result<HashMap<Uuid, UserIdentity>>;
}

/// Fixed identity table, used by tests and local runs.
#[derive(Default)]
pub struct StaticIdentityResolver {
    users: RwLock<HashMap<Uuid, UserIdentity>>,
}

impl StaticIdentityResolver {
    pub fn new(users: impl IntoIterator<Item = UserIdentity>) -> Self {
        Self {
            users: RwLock::new(users.into_iter().map(|u| (u.id, u)).collect()),
        }
    }

    pub async fn insert(&self, identity: UserIdentity) {
        self.users.write().await.insert(identity.id, identity);
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentityResolver {
    async fn resolve(&self, user_ids: &[Uuid]) -> Result<HashMap<Uuid, UserIdentity>> {
        let users = self.users.read().await;
        Ok(user_ids
            .iter()
            .filter_map(|id| users.get(id).map(|u| (*id, u.clone())))
            .collect())
    }
}

/// Embed author identities into a page of posts with a single resolver call.
pub async fn populate_posts(
    resolver: &dyn IdentityResolver,
    posts: Vec<Post>,
) -> Result<Vec<PostView>> {
    if posts.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = posts
        .iter()
        .flat_map(|post| post.author_ids())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let identities = resolver.resolve(&ids).await?;
    if identities.len() < ids.len() {
        tracing::debug!(
            requested = ids.len(),
            resolved = identities.len(),
            "some author identities could not be resolved"
        );
    }

    Ok(posts
        .into_iter()
        .map(|post| render_post(post, &identities))
        .collect())
}

/// Embed identities into one post.
pub async fn populate_post(resolver: &dyn IdentityResolver, post: Post) -> Result<PostView> {
    let mut views = populate_posts(resolver, vec![post]).await?;
    views
        .pop()
        .ok_or_else(|| crate::error::AppError::Internal("populated post missing".to_string()))
}

fn render_post(post: Post, identities: &HashMap<Uuid, UserIdentity>) -> PostView {
    let comments = post
        .comments
        .into_iter()
        .map(|comment| CommentView {
            id: comment.id,
            user: identities
                .get(&comment.user_id)
                .map(AuthorView::comment_author),
            text: comment.text,
            created_at: comment.created_at,
        })
        .collect();

    PostView {
        id: post.id,
        user: identities.get(&post.user_id).map(AuthorView::post_author),
        content: post.content,
        image: post.image,
        likes: post.likes.into_iter().collect(),
        comments,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewComment, NewPost};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn identity(name: &str) -> UserIdentity {
        UserIdentity {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            profile_image: format!("https://img.example.com/{}.png", name.to_lowercase()),
        }
    }

    struct CountingResolver {
        inner: StaticIdentityResolver,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl IdentityResolver for CountingResolver {
        async fn resolve(&self, user_ids: &[Uuid]) -> Result<HashMap<Uuid, UserIdentity>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.resolve(user_ids).await
        }
    }

    #[tokio::test]
    async fn resolves_a_page_in_one_call() {
        let alice = identity("Alice");
        let bob = identity("Bob");
        let resolver = CountingResolver {
            inner: StaticIdentityResolver::new([alice.clone(), bob.clone()]),
            calls: AtomicUsize::new(0),
        };

        let mut first = Post::new(alice.id, NewPost::parse(Some("one"), None).unwrap());
        first.push_comment(bob.id, NewComment::parse(Some("hi")).unwrap());
        let second = Post::new(bob.id, NewPost::parse(Some("two"), None).unwrap());

        let views = populate_posts(&resolver, vec![first, second]).await.unwrap();

        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
        assert_eq!(views[0].user.as_ref().unwrap().email.as_deref(), Some("alice@example.com"));
        let commenter = views[0].comments[0].user.as_ref().unwrap();
        assert_eq!(commenter.name, "Bob");
        assert_eq!(commenter.email, None);
        assert_eq!(views[1].user.as_ref().unwrap().name, "Bob");
    }

    #[tokio::test]
    async fn identities_are_read_when_rendering() {
        let alice = identity("Alice");
        let resolver = StaticIdentityResolver::new([alice.clone()]);
        let post = Post::new(alice.id, NewPost::parse(Some("hello"), None).unwrap());

        let before = populate_post(&resolver, post.clone()).await.unwrap();
        assert_eq!(before.user.unwrap().name, "Alice");

        resolver
            .insert(UserIdentity {
                name: "Alice Cooper".to_string(),
                ..alice
            })
            .await;

        let after = populate_post(&resolver, post).await.unwrap();
        assert_eq!(after.user.unwrap().name, "Alice Cooper");
    }

    #[tokio::test]
    async fn unknown_authors_render_as_none() {
        let resolver = StaticIdentityResolver::default();
        let post = Post::new(Uuid::new_v4(), NewPost::parse(Some("orphan"), None).unwrap());

        let view = populate_post(&resolver, post).await.unwrap();
        assert!(view.user.is_none());
    }
}
