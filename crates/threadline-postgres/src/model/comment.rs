//! Comment model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::comments;
use crate::types::CommentStatus;
use crate::types::constants::comment;

/// Comment model representing a threaded reply on a post.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Comment {
    /// Unique comment identifier.
    pub id: Uuid,
    /// Comment text content, or the tombstone once deleted.
    pub content: String,
    /// Identifier of the post owned by the post service.
    pub post_id: String,
    /// Identifier of the author captured at creation time.
    pub author_id: String,
    /// Display name of the author captured at creation time.
    pub author_name: String,
    /// Avatar of the author captured at creation time.
    pub author_avatar: Option<String>,
    /// Parent comment for threaded replies (NULL for top-level comments).
    pub parent_id: Option<Uuid>,
    /// Distance from the top-level ancestor.
    pub depth: i16,
    /// Identifiers of the users that liked this comment.
    pub likes: Vec<Option<String>>,
    /// Cardinality of `likes`.
    pub like_count: i32,
    /// Lifecycle state.
    pub status: CommentStatus,
    /// Timestamp when the comment was created.
    pub created_at: Timestamp,
    /// Timestamp when the comment was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new comment.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewComment {
    /// Comment ID.
    pub id: Uuid,
    /// Comment content.
    pub content: String,
    /// Post ID.
    pub post_id: String,
    /// Author ID.
    pub author_id: String,
    /// Author display name.
    pub author_name: String,
    /// Author avatar.
    pub author_avatar: Option<String>,
    /// Parent comment ID for replies.
    pub parent_id: Option<Uuid>,
    /// Depth derived from the persisted parent.
    pub depth: i16,
}

/// Data for updating a comment.
///
/// Every mutation goes through a single `UPDATE` with this changeset, so the
/// like set and its count are always written together.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateComment {
    /// Comment content.
    pub content: Option<String>,
    /// Like set.
    pub likes: Option<Vec<Option<String>>>,
    /// Like count, always `likes.len()` when `likes` is set.
    pub like_count: Option<i32>,
    /// Lifecycle state.
    pub status: Option<CommentStatus>,
}

impl Comment {
    /// Returns whether this comment is deleted.
    pub fn is_deleted(&self) -> bool {
        self.status.is_deleted()
    }

    /// Returns whether this comment accepts replies without exceeding the depth limit.
    pub fn accepts_replies(&self) -> bool {
        self.depth < comment::MAX_DEPTH
    }

    /// Returns whether `user_id` is the author of this comment.
    pub fn is_authored_by(&self, user_id: &str) -> bool {
        self.author_id == user_id
    }

    /// Returns the like set without null entries.
    pub fn likes(&self) -> Vec<String> {
        self.likes.iter().flatten().cloned().collect()
    }

    /// Returns the like set with `user_id` added or removed, and whether it is
    /// now liked.
    pub fn toggled_likes(&self, user_id: &str) -> (Vec<String>, bool) {
        let mut likes = self.likes();
        match likes.iter().position(|like| like == user_id) {
            Some(index) => {
                likes.remove(index);
                (likes, false)
            }
            None => {
                likes.push(user_id.to_owned());
                (likes, true)
            }
        }
    }
}

impl NewComment {
    /// Creates a new top-level comment on a post.
    pub fn for_post(
        post_id: impl Into<String>,
        author_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            content: content.into(),
            post_id: post_id.into(),
            author_id: author_id.into(),
            author_name: comment::UNKNOWN_AUTHOR.to_owned(),
            author_avatar: None,
            parent_id: None,
            depth: 0,
        }
    }

    /// Attaches the comment to `parent`, one level below it.
    pub fn with_parent(mut self, parent: &Comment) -> Self {
        self.parent_id = Some(parent.id);
        self.depth = parent.depth.saturating_add(1);
        self
    }

    /// Sets the author display name, falling back to the unknown author.
    pub fn with_author_name(mut self, name: Option<String>) -> Self {
        self.author_name = name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| comment::UNKNOWN_AUTHOR.to_owned());
        self
    }

    /// Sets the author avatar.
    pub fn with_author_avatar(mut self, avatar: Option<String>) -> Self {
        self.author_avatar = avatar;
        self
    }
}

impl UpdateComment {
    /// Changeset replacing the content.
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Changeset for a soft delete: tombstone content and deleted status.
    pub fn soft_delete() -> Self {
        Self {
            content: Some(comment::TOMBSTONE.to_owned()),
            status: Some(CommentStatus::Deleted),
            ..Default::default()
        }
    }

    /// Changeset writing the like set together with its derived count.
    pub fn likes(likes: Vec<String>) -> Self {
        let like_count = i32::try_from(likes.len()).unwrap_or(i32::MAX);
        Self {
            likes: Some(likes.into_iter().map(Some).collect()),
            like_count: Some(like_count),
            ..Default::default()
        }
    }
}
