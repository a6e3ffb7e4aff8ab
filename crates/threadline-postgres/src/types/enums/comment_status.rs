//! Comment status enumeration for soft deletion tracking.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Defines the lifecycle state of a comment.
///
/// This enumeration corresponds to the `COMMENT_STATUS` PostgreSQL enum.
/// Deletion is logical: a deleted comment keeps its row, its descendants and
/// its position in the thread, but its content is replaced by a tombstone.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[ExistingTypePath = "crate::schema::sql_types::CommentStatus"]
pub enum CommentStatus {
    /// Comment is visible and can be edited or liked
    #[db_rename = "active"]
    #[serde(rename = "active")]
    #[strum(serialize = "active")]
    #[default]
    Active,

    /// Comment was deleted by its author or an administrator (terminal)
    #[db_rename = "deleted"]
    #[serde(rename = "deleted")]
    #[strum(serialize = "deleted")]
    Deleted,
}

impl CommentStatus {
    /// Returns whether the comment is visible in listings.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, CommentStatus::Active)
    }

    /// Returns whether the comment has been soft-deleted.
    #[inline]
    pub fn is_deleted(self) -> bool {
        matches!(self, CommentStatus::Deleted)
    }
}
