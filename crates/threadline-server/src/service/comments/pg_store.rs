//! PostgreSQL-backed comment store.

use threadline_postgres::PgClient;
use threadline_postgres::model::{Comment, NewComment};
use threadline_postgres::query::{CommentRepository, LikeToggle};
use threadline_postgres::types::{OffsetPage, OffsetPagination};
use uuid::Uuid;

use super::CommentStore;
use crate::Result;

/// [`CommentStore`] over a pooled PostgreSQL connection.
///
/// Every call checks out its own connection; row-level atomicity comes from
/// the single-statement updates and the locking transaction used for likes.
#[derive(Debug, Clone)]
pub struct PgCommentStore {
    pg_client: PgClient,
}

impl PgCommentStore {
    /// Creates a store using the given connection pool.
    pub fn new(pg_client: PgClient) -> Self {
        Self { pg_client }
    }
}

#[async_trait::async_trait]
impl CommentStore for PgCommentStore {
    async fn create(&self, new_comment: NewComment) -> Result<Comment> {
        let mut conn = self.pg_client.get_connection().await?;
        Ok(conn.create_comment(new_comment).await?)
    }

    async fn find(&self, comment_id: Uuid) -> Result<Option<Comment>> {
        let mut conn = self.pg_client.get_connection().await?;
        Ok(conn.find_comment_by_id(comment_id).await?)
    }

    async fn list_active(
        &self,
        post_id: &str,
        pagination: OffsetPagination,
    ) -> Result<OffsetPage<Comment>> {
        let mut conn = self.pg_client.get_connection().await?;
        let page = conn
            .offset_list_post_comments(post_id, pagination.with_count())
            .await?;
        Ok(page)
    }

    async fn update_content(
        &self,
        comment_id: Uuid,
        content: String,
    ) -> Result<Option<Comment>> {
        let mut conn = self.pg_client.get_connection().await?;
        Ok(conn.update_comment_content(comment_id, content).await?)
    }

    async fn soft_delete(&self, comment_id: Uuid) -> Result<Option<Comment>> {
        let mut conn = self.pg_client.get_connection().await?;
        Ok(conn.soft_delete_comment(comment_id).await?)
    }

    async fn toggle_like(&self, comment_id: Uuid, user_id: &str) -> Result<Option<LikeToggle>> {
        let mut conn = self.pg_client.get_connection().await?;
        Ok(conn.toggle_comment_like(comment_id, user_id).await?)
    }

    async fn ping(&self) -> Result<()> {
        Ok(self.pg_client.ping().await?)
    }
}
