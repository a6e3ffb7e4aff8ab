//! Storage seam between the comment service and its persistence.

use std::fmt;
use std::sync::Arc;

use threadline_postgres::model::{Comment, NewComment};
use threadline_postgres::query::LikeToggle;
use threadline_postgres::types::{OffsetPage, OffsetPagination};
use uuid::Uuid;

use crate::Result;

/// Durable keyed storage for comments.
///
/// Mutating methods only apply to active comments and return `None` when no
/// active comment with the given id exists. Each mutation is atomic per
/// comment: readers never observe a partially written record.
#[async_trait::async_trait]
pub trait CommentStore: Send + Sync {
    /// Persists a new comment.
    async fn create(&self, new_comment: NewComment) -> Result<Comment>;

    /// Fetches a comment by id, whatever its status.
    async fn find(&self, comment_id: Uuid) -> Result<Option<Comment>>;

    /// Lists active comments of a post in creation order, with the total
    /// count of active comments of that post.
    async fn list_active(
        &self,
        post_id: &str,
        pagination: OffsetPagination,
    ) -> Result<OffsetPage<Comment>>;

    /// Replaces the content of an active comment.
    async fn update_content(&self, comment_id: Uuid, content: String)
    -> Result<Option<Comment>>;

    /// Marks an active comment as deleted and replaces its content with the
    /// tombstone.
    async fn soft_delete(&self, comment_id: Uuid) -> Result<Option<Comment>>;

    /// Adds `user_id` to the like set of an active comment, or removes it if
    /// already present, recomputing the like count.
    async fn toggle_like(&self, comment_id: Uuid, user_id: &str) -> Result<Option<LikeToggle>>;

    /// Checks that the store can serve requests.
    async fn ping(&self) -> Result<()>;
}

/// Shared handle to a [`CommentStore`].
#[derive(Clone)]
pub struct CommentStoreHandle {
    inner: Arc<dyn CommentStore>,
}

impl CommentStoreHandle {
    /// Wraps a store into a shareable handle.
    pub fn new(store: impl CommentStore + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }
}

impl fmt::Debug for CommentStoreHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommentStoreHandle").finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl CommentStore for CommentStoreHandle {
    async fn create(&self, new_comment: NewComment) -> Result<Comment> {
        self.inner.create(new_comment).await
    }

    async fn find(&self, comment_id: Uuid) -> Result<Option<Comment>> {
        self.inner.find(comment_id).await
    }

    async fn list_active(
        &self,
        post_id: &str,
        pagination: OffsetPagination,
    ) -> Result<OffsetPage<Comment>> {
        self.inner.list_active(post_id, pagination).await
    }

    async fn update_content(
        &self,
        comment_id: Uuid,
        content: String,
    ) -> Result<Option<Comment>> {
        self.inner.update_content(comment_id, content).await
    }

    async fn soft_delete(&self, comment_id: Uuid) -> Result<Option<Comment>> {
        self.inner.soft_delete(comment_id).await
    }

    async fn toggle_like(&self, comment_id: Uuid, user_id: &str) -> Result<Option<LikeToggle>> {
        self.inner.toggle_like(comment_id, user_id).await
    }

    async fn ping(&self) -> Result<()> {
        self.inner.ping().await
    }
}
