//! Constants used throughout the comment store.

/// Database-related constants.
pub mod database {
    /// Default pagination limit.
    pub const DEFAULT_PAGE_SIZE: i64 = 50;

    /// Maximum pagination limit.
    pub const MAX_PAGE_SIZE: i64 = 100;
}

/// Constants related to comment content and threading.
pub mod comment {
    /// Maximum nesting depth of a reply (top-level comments have depth 0).
    pub const MAX_DEPTH: i16 = 5;

    /// Minimum number of characters in comment content.
    pub const MIN_CONTENT_LENGTH: usize = 1;

    /// Maximum number of characters in comment content.
    pub const MAX_CONTENT_LENGTH: usize = 1000;

    /// Maximum number of characters in a post identifier.
    pub const MAX_POST_ID_LENGTH: usize = 128;

    /// Content substituted for the original text of a deleted comment.
    pub const TOMBSTONE: &str = "[deleted]";

    /// Author name recorded when the identity carries no display name.
    pub const UNKNOWN_AUTHOR: &str = "Unknown User";
}
