use super::{PostCheck, PostMutation, PostStore};
use crate::error::Result;
use crate::models::Post;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    posts: HashMap<Uuid, (u64, Post)>,
    next_seq: u64,
}

/// Post store held in process memory.
///
/// A single write lock covers every mutation, which trivially serializes
/// concurrent updates to the same post. Insertion sequence breaks ties
/// between equal `created_at` values.
#[derive(Default)]
pub struct InMemoryPostStore {
    inner: RwLock<Inner>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.posts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn create(&self, post: Post) -> Result<Uuid> {
        let mut inner = self.inner.write().await;
        let seq = inner.next_seq;
        inner.next_seq += 1;

        let id = post.id;
        inner.posts.insert(id, (seq, post));
        Ok(id)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Post>> {
        let inner = self.inner.read().await;
        Ok(inner.posts.get(&id).map(|(_, post)| post.clone()))
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Post>> {
        let inner = self.inner.read().await;
        let mut entries: Vec<&(u64, Post)> = inner.posts.values().collect();
        entries.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| seq_b.cmp(seq_a))
        });

        Ok(entries
            .into_iter()
            .take(limit)
            .map(|(_, post)| post.clone())
            .collect())
    }

    async fn mutate(&self, id: Uuid, mutation: PostMutation) -> Result<Option<Post>> {
        let mut inner = self.inner.write().await;
        let Some((_, stored)) = inner.posts.get_mut(&id) else {
            return Ok(None);
        };

        // Work on a copy so a failed mutation leaves the stored post as it was.
        let mut draft = stored.clone();
        mutation(&mut draft)?;
        *stored = draft.clone();

        Ok(Some(draft))
    }

    async fn delete(&self, id: Uuid, check: PostCheck) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let Some((_, stored)) = inner.posts.get(&id) else {
            return Ok(false);
        };

        check(stored)?;
        inner.posts.remove(&id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::NewPost;
    use chrono::{Duration, Utc};

    fn post(content: &str) -> Post {
        Post::new(
            Uuid::new_v4(),
            NewPost::parse(Some(content), None).expect("valid content"),
        )
    }

    #[tokio::test]
    async fn lists_newest_first_and_respects_limit() {
        let store = InMemoryPostStore::new();
        let base = Utc::now();
        for (i, content) in ["a", "b", "c"].into_iter().enumerate() {
            let mut p = post(content);
            p.created_at = base + Duration::seconds(i as i64);
            store.create(p).await.unwrap();
        }

        let listed = store.list_recent(2).await.unwrap();
        let contents: Vec<_> = listed.iter().map(|p| p.content.as_str()).collect();
        assert_eq!(contents, ["c", "b"]);
    }

    #[tokio::test]
    async fn equal_timestamps_fall_back_to_insertion_order() {
        let store = InMemoryPostStore::new();
        let at = Utc::now();
        for content in ["first", "second"] {
            let mut p = post(content);
            p.created_at = at;
            store.create(p).await.unwrap();
        }

        let listed = store.list_recent(10).await.unwrap();
        assert_eq!(listed[0].content, "second");
        assert_eq!(listed[1].content, "first");
    }

    #[tokio::test]
    async fn failed_mutation_leaves_post_unchanged() {
        let store = InMemoryPostStore::new();
        let original = post("keep me");
        let id = store.create(original.clone()).await.unwrap();

        let result = store
            .mutate(
                id,
                Box::new(|p: &mut Post| {
                    p.content = "changed".to_string();
                    Err(AppError::Forbidden("nope".to_string()))
                }),
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
        assert_eq!(store.get_by_id(id).await.unwrap(), Some(original));
    }

    #[tokio::test]
    async fn mutate_and_delete_report_missing_ids() {
        let store = InMemoryPostStore::new();
        let missing = Uuid::new_v4();

        let mutated = store
            .mutate(missing, Box::new(|_: &mut Post| Ok(())))
            .await
            .unwrap();
        assert!(mutated.is_none());
        assert!(!store
            .delete(missing, Box::new(|_: &Post| Ok(())))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn rejected_delete_keeps_the_post() {
        let store = InMemoryPostStore::new();
        let id = store.create(post("stay")).await.unwrap();

        let result = store
            .delete(
                id,
                Box::new(|_: &Post| Err(AppError::Forbidden("nope".to_string()))),
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
        assert!(store.get_by_id(id).await.unwrap().is_some());

        assert!(store.delete(id, Box::new(|_: &Post| Ok(()))).await.unwrap());
        assert!(store.is_empty().await);
    }
}
