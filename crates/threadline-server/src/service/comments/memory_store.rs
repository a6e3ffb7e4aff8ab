//! In-memory comment store for tests.

use std::sync::{Arc, Mutex, MutexGuard};

use jiff::Timestamp;
use threadline_postgres::model::{Comment, NewComment, UpdateComment};
use threadline_postgres::query::LikeToggle;
use threadline_postgres::types::{CommentStatus, OffsetPage, OffsetPagination};
use uuid::Uuid;

use super::CommentStore;
use crate::{Error, Result};

/// [`CommentStore`] keeping comments in insertion order behind a mutex.
///
/// Clones share the same comments. Every operation holds the lock for its
/// whole read-modify-write, which gives the same per-record atomicity as the
/// database store.
#[derive(Debug, Clone, Default)]
pub struct MemoryCommentStore {
    comments: Arc<Mutex<Vec<Comment>>>,
}

impl MemoryCommentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every stored comment, deleted ones included.
    pub fn snapshot(&self) -> Vec<Comment> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Comment>> {
        self.comments
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Applies `changes` to the active comment `comment_id`.
    fn update_active(
        &self,
        comment_id: Uuid,
        changes: impl FnOnce(&Comment) -> UpdateComment,
    ) -> Option<Comment> {
        let mut comments = self.lock();
        let comment = comments
            .iter_mut()
            .find(|comment| comment.id == comment_id && comment.status.is_active())?;

        let changes = changes(comment);
        if let Some(content) = changes.content {
            comment.content = content;
        }
        if let Some(likes) = changes.likes {
            comment.likes = likes;
        }
        if let Some(like_count) = changes.like_count {
            comment.like_count = like_count;
        }
        if let Some(status) = changes.status {
            comment.status = status;
        }
        comment.updated_at = jiff_diesel::Timestamp::from(Timestamp::now());

        Some(comment.clone())
    }
}

#[async_trait::async_trait]
impl CommentStore for MemoryCommentStore {
    async fn create(&self, new_comment: NewComment) -> Result<Comment> {
        let mut comments = self.lock();
        if comments.iter().any(|comment| comment.id == new_comment.id) {
            return Err(Error::internal("memory", "Duplicate comment id"));
        }

        let now = jiff_diesel::Timestamp::from(Timestamp::now());
        let comment = Comment {
            id: new_comment.id,
            content: new_comment.content,
            post_id: new_comment.post_id,
            author_id: new_comment.author_id,
            author_name: new_comment.author_name,
            author_avatar: new_comment.author_avatar,
            parent_id: new_comment.parent_id,
            depth: new_comment.depth,
            likes: Vec::new(),
            like_count: 0,
            status: CommentStatus::Active,
            created_at: now,
            updated_at: now,
        };

        comments.push(comment.clone());
        Ok(comment)
    }

    async fn find(&self, comment_id: Uuid) -> Result<Option<Comment>> {
        let comments = self.lock();
        Ok(comments
            .iter()
            .find(|comment| comment.id == comment_id)
            .cloned())
    }

    async fn list_active(
        &self,
        post_id: &str,
        pagination: OffsetPagination,
    ) -> Result<OffsetPage<Comment>> {
        let comments = self.lock();
        let active: Vec<&Comment> = comments
            .iter()
            .filter(|comment| comment.post_id == post_id && comment.status.is_active())
            .collect();

        let total = i64::try_from(active.len()).unwrap_or(i64::MAX);
        let offset = usize::try_from(pagination.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(pagination.limit).unwrap_or(0);

        let items = active
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok(OffsetPage::new(items, Some(total)))
    }

    async fn update_content(
        &self,
        comment_id: Uuid,
        content: String,
    ) -> Result<Option<Comment>> {
        Ok(self.update_active(comment_id, |_| UpdateComment::content(content)))
    }

    async fn soft_delete(&self, comment_id: Uuid) -> Result<Option<Comment>> {
        Ok(self.update_active(comment_id, |_| UpdateComment::soft_delete()))
    }

    async fn toggle_like(&self, comment_id: Uuid, user_id: &str) -> Result<Option<LikeToggle>> {
        let mut liked = false;
        let comment = self.update_active(comment_id, |comment| {
            let (likes, now_liked) = comment.toggled_likes(user_id);
            liked = now_liked;
            UpdateComment::likes(likes)
        });

        Ok(comment.map(|comment| LikeToggle { comment, liked }))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_comment(post_id: &str, content: &str) -> NewComment {
        NewComment::for_post(post_id, "author", content)
    }

    #[tokio::test]
    async fn lists_only_active_comments_of_the_post() -> anyhow::Result<()> {
        let store = MemoryCommentStore::new();
        let first = store.create(new_comment("p1", "first")).await?;
        store.create(new_comment("p2", "other post")).await?;
        let third = store.create(new_comment("p1", "third")).await?;
        store.soft_delete(first.id).await?;

        let page = store
            .list_active("p1", OffsetPagination::from_page(1, 50))
            .await?;

        assert_eq!(page.total, Some(1));
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, third.id);
        Ok(())
    }

    #[tokio::test]
    async fn pages_keep_creation_order() -> anyhow::Result<()> {
        let store = MemoryCommentStore::new();
        let mut ids = Vec::new();
        for index in 0..5 {
            ids.push(store.create(new_comment("p1", &format!("c{index}"))).await?.id);
        }

        let page = store
            .list_active("p1", OffsetPagination::from_page(2, 2))
            .await?;

        assert_eq!(page.total, Some(5));
        let listed: Vec<Uuid> = page.items.iter().map(|comment| comment.id).collect();
        assert_eq!(listed, vec![ids[2], ids[3]]);
        Ok(())
    }

    #[tokio::test]
    async fn mutations_skip_deleted_comments() -> anyhow::Result<()> {
        let store = MemoryCommentStore::new();
        let comment = store.create(new_comment("p1", "hello")).await?;

        assert!(store.soft_delete(comment.id).await?.is_some());
        assert!(store.soft_delete(comment.id).await?.is_none());
        assert!(store.update_content(comment.id, "edit".into()).await?.is_none());
        assert!(store.toggle_like(comment.id, "u1").await?.is_none());

        let stored = store.find(comment.id).await?.expect("comment is retained");
        assert!(stored.is_deleted());
        assert_eq!(stored.content, "[deleted]");
        Ok(())
    }

    #[tokio::test]
    async fn toggle_like_keeps_count_in_sync() -> anyhow::Result<()> {
        let store = MemoryCommentStore::new();
        let comment = store.create(new_comment("p1", "hello")).await?;

        let toggle = store.toggle_like(comment.id, "u1").await?.expect("active");
        assert!(toggle.liked);
        assert_eq!(toggle.comment.like_count, 1);

        let toggle = store.toggle_like(comment.id, "u2").await?.expect("active");
        assert_eq!(toggle.comment.like_count, 2);

        let toggle = store.toggle_like(comment.id, "u1").await?.expect("active");
        assert!(!toggle.liked);
        assert_eq!(toggle.comment.like_count, 1);
        assert_eq!(toggle.comment.likes(), vec!["u2".to_owned()]);
        Ok(())
    }
}
