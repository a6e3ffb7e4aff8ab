//! Comments repository for threaded comment operations.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::model::{Comment, NewComment, UpdateComment};
use crate::types::{CommentStatus, OffsetPage, OffsetPagination};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Outcome of a like toggle on an active comment.
#[derive(Debug, Clone, PartialEq)]
pub struct LikeToggle {
    /// Comment as persisted after the toggle.
    pub comment: Comment,
    /// Whether the caller likes the comment after the toggle.
    pub liked: bool,
}

/// Repository for comment database operations.
///
/// Mutations that must not apply to soft-deleted comments are filtered on
/// `status = 'active'` and return `None` when no active row matched.
pub trait CommentRepository {
    /// Inserts a new comment.
    fn create_comment(
        &mut self,
        new_comment: NewComment,
    ) -> impl Future<Output = PgResult<Comment>> + Send;

    /// Finds a comment by its unique identifier, including deleted ones.
    fn find_comment_by_id(
        &mut self,
        comment_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Comment>>> + Send;

    /// Lists active comments of a post in creation order.
    fn offset_list_post_comments(
        &mut self,
        post_id: &str,
        pagination: OffsetPagination,
    ) -> impl Future<Output = PgResult<OffsetPage<Comment>>> + Send;

    /// Counts active comments of a post.
    fn count_post_comments(&mut self, post_id: &str) -> impl Future<Output = PgResult<i64>> + Send;

    /// Replaces the content of an active comment.
    fn update_comment_content(
        &mut self,
        comment_id: Uuid,
        content: String,
    ) -> impl Future<Output = PgResult<Option<Comment>>> + Send;

    /// Soft deletes an active comment by replacing its content with the tombstone.
    fn soft_delete_comment(
        &mut self,
        comment_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Comment>>> + Send;

    /// Adds or removes `user_id` from the like set of an active comment.
    ///
    /// The row is locked for the duration of the read-modify-write, so
    /// concurrent toggles on the same comment serialize.
    fn toggle_comment_like(
        &mut self,
        comment_id: Uuid,
        user_id: &str,
    ) -> impl Future<Output = PgResult<Option<LikeToggle>>> + Send;
}

impl CommentRepository for PgConnection {
    async fn create_comment(&mut self, new_comment: NewComment) -> PgResult<Comment> {
        use schema::comments;

        let comment = diesel::insert_into(comments::table)
            .values(&new_comment)
            .returning(Comment::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            comment_id = %comment.id,
            post_id = %comment.post_id,
            depth = comment.depth,
            "Comment inserted"
        );

        Ok(comment)
    }

    async fn find_comment_by_id(&mut self, comment_id: Uuid) -> PgResult<Option<Comment>> {
        use schema::comments::{self, dsl};

        let comment = comments::table
            .filter(dsl::id.eq(comment_id))
            .select(Comment::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(comment)
    }

    async fn offset_list_post_comments(
        &mut self,
        post_id: &str,
        pagination: OffsetPagination,
    ) -> PgResult<OffsetPage<Comment>> {
        use schema::comments::{self, dsl};

        let total = if pagination.include_count {
            Some(self.count_post_comments(post_id).await?)
        } else {
            None
        };

        let items = comments::table
            .filter(dsl::post_id.eq(post_id))
            .filter(dsl::status.eq(CommentStatus::Active))
            .select(Comment::as_select())
            .order((dsl::created_at.asc(), dsl::id.asc()))
            .limit(pagination.limit)
            .offset(pagination.offset)
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(OffsetPage::new(items, total))
    }

    async fn count_post_comments(&mut self, post_id: &str) -> PgResult<i64> {
        use schema::comments::{self, dsl};

        let count = comments::table
            .filter(dsl::post_id.eq(post_id))
            .filter(dsl::status.eq(CommentStatus::Active))
            .count()
            .get_result::<i64>(self)
            .await
            .map_err(PgError::from)?;

        Ok(count)
    }

    async fn update_comment_content(
        &mut self,
        comment_id: Uuid,
        content: String,
    ) -> PgResult<Option<Comment>> {
        use schema::comments::{self, dsl};

        let comment = diesel::update(
            comments::table
                .filter(dsl::id.eq(comment_id))
                .filter(dsl::status.eq(CommentStatus::Active)),
        )
        .set(&UpdateComment::content(content))
        .returning(Comment::as_returning())
        .get_result(self)
        .await
        .optional()
        .map_err(PgError::from)?;

        Ok(comment)
    }

    async fn soft_delete_comment(&mut self, comment_id: Uuid) -> PgResult<Option<Comment>> {
        use schema::comments::{self, dsl};

        let comment = diesel::update(
            comments::table
                .filter(dsl::id.eq(comment_id))
                .filter(dsl::status.eq(CommentStatus::Active)),
        )
        .set(&UpdateComment::soft_delete())
        .returning(Comment::as_returning())
        .get_result(self)
        .await
        .optional()
        .map_err(PgError::from)?;

        Ok(comment)
    }

    async fn toggle_comment_like(
        &mut self,
        comment_id: Uuid,
        user_id: &str,
    ) -> PgResult<Option<LikeToggle>> {
        use schema::comments::{self, dsl};

        let user_id = user_id.to_owned();
        self.transaction(|conn| {
            Box::pin(async move {
                let current = comments::table
                    .filter(dsl::id.eq(comment_id))
                    .filter(dsl::status.eq(CommentStatus::Active))
                    .select(Comment::as_select())
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;

                let Some(current) = current else {
                    return Ok::<_, PgError>(None);
                };

                let (likes, liked) = current.toggled_likes(&user_id);
                let comment = diesel::update(comments::table.filter(dsl::id.eq(comment_id)))
                    .set(&UpdateComment::likes(likes))
                    .returning(Comment::as_returning())
                    .get_result(conn)
                    .await?;

                tracing::debug!(
                    target: TRACING_TARGET_QUERY,
                    comment_id = %comment_id,
                    liked,
                    like_count = comment.like_count,
                    "Comment like toggled"
                );

                Ok(Some(LikeToggle { comment, liked }))
            })
        })
        .await
    }
}
