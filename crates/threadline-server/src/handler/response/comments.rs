//! Comment response types.

use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use threadline_postgres::model;
use threadline_postgres::query::LikeToggle;
use threadline_postgres::types::CommentStatus;
use uuid::Uuid;

use crate::service::{self, CommentThread};

/// Represents a comment.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// ID of the comment.
    pub id: Uuid,
    /// Comment text content, or `[deleted]` once deleted.
    pub content: String,
    /// ID of the post this comment belongs to.
    pub post_id: String,
    /// ID of the author.
    pub author_id: String,
    /// Display name of the author at creation time.
    pub author_name: String,
    /// Avatar of the author at creation time.
    pub author_avatar: Option<String>,
    /// Parent comment ID for replies.
    pub parent_id: Option<Uuid>,
    /// Distance from the top-level ancestor, 0 to 5.
    pub depth: i16,
    /// IDs of the users that liked the comment.
    pub likes: Vec<String>,
    /// Number of likes.
    pub like_count: i32,
    /// Lifecycle state.
    pub status: CommentStatus,
    /// Timestamp when the comment was created.
    pub created_at: Timestamp,
    /// Timestamp when the comment was last updated.
    pub updated_at: Timestamp,
}

impl Comment {
    /// Creates a Comment response from a database model.
    pub fn from_model(comment: model::Comment) -> Self {
        Self {
            likes: comment.likes(),
            id: comment.id,
            content: comment.content,
            post_id: comment.post_id,
            author_id: comment.author_id,
            author_name: comment.author_name,
            author_avatar: comment.author_avatar,
            parent_id: comment.parent_id,
            depth: comment.depth,
            like_count: comment.like_count,
            status: comment.status,
            created_at: comment.created_at.into(),
            updated_at: comment.updated_at.into(),
        }
    }
}

/// A comment with its nested replies.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentNode {
    /// The comment itself.
    #[serde(flatten)]
    pub comment: Comment,
    /// Direct replies, oldest first.
    pub replies: Vec<CommentNode>,
}

impl CommentNode {
    /// Creates a node response from a reply tree node.
    pub fn from_node(node: service::CommentNode) -> Self {
        Self {
            comment: Comment::from_model(node.comment),
            replies: node.replies.into_iter().map(Self::from_node).collect(),
        }
    }
}

/// Page metadata of a comment listing.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentsPagination {
    /// Current page, starting at 1.
    pub current: i64,
    /// Total number of pages.
    pub pages: i64,
    /// Number of active comments of the post.
    pub total: i64,
    /// Page size.
    pub limit: i64,
}

/// Response for listing comments.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentsPage {
    /// Reply trees of the page.
    pub comments: Vec<CommentNode>,
    /// Page metadata.
    pub pagination: CommentsPagination,
}

impl CommentsPage {
    /// Creates a page response from a comment thread.
    pub fn from_thread(thread: CommentThread) -> Self {
        Self {
            comments: thread.nodes.into_iter().map(CommentNode::from_node).collect(),
            pagination: CommentsPagination {
                current: thread.page,
                pages: thread.pages,
                total: thread.total,
                limit: thread.limit,
            },
        }
    }
}

/// Result of toggling a like.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatus {
    /// Whether the caller now likes the comment.
    pub liked: bool,
    /// Number of likes after the toggle.
    pub like_count: i32,
}

impl LikeStatus {
    /// Creates a like status from a toggle result.
    pub fn from_toggle(toggle: LikeToggle) -> Self {
        Self {
            liked: toggle.liked,
            like_count: toggle.comment.like_count,
        }
    }
}

/// Confirmation returned after a comment is deleted.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteConfirmation {
    /// Human readable confirmation.
    pub message: String,
}

impl Default for DeleteConfirmation {
    fn default() -> Self {
        Self {
            message: "Comment deleted successfully".to_owned(),
        }
    }
}
