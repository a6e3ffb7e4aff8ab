//! Comment request types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use threadline_postgres::types::constants::database::DEFAULT_PAGE_SIZE;
use uuid::Uuid;
use validator::Validate;

use super::validations::not_blank;

/// Request payload for creating a comment or a reply.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateComment {
    /// Comment text content.
    #[validate(
        length(min = 1, max = 1000),
        custom(function = "not_blank")
    )]
    pub content: String,
    /// Post the comment belongs to.
    #[validate(length(min = 1, max = 128))]
    pub post_id: String,
    /// Comment being replied to, absent for top-level comments.
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

/// Request payload to update a comment.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComment {
    /// Replacement comment content.
    #[validate(
        length(min = 1, max = 1000),
        custom(function = "not_blank")
    )]
    pub content: String,
}

/// Query parameters for listing a post's comments.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListComments {
    /// Post whose comments are listed.
    #[validate(length(min = 1, max = 128))]
    pub post_id: String,
    /// Page number, starting at 1 and at most one million.
    #[serde(default = "ListComments::default_page")]
    #[validate(range(min = 1, max = 1_000_000))]
    pub page: i64,
    /// Number of comments per page.
    #[serde(default = "ListComments::default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: i64,
}

impl ListComments {
    fn default_page() -> i64 {
        1
    }

    fn default_limit() -> i64 {
        DEFAULT_PAGE_SIZE
    }
}

#[cfg(test)]
mod tests {
    use threadline_postgres::types::constants::comment::MAX_CONTENT_LENGTH;

    use super::*;

    #[test]
    fn whitespace_content_is_rejected() {
        let request = CreateComment {
            content: "   ".into(),
            post_id: "p1".into(),
            parent_id: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn content_length_counts_characters() {
        let request = UpdateComment {
            content: "é".repeat(MAX_CONTENT_LENGTH),
        };
        assert!(request.validate().is_ok());

        let request = UpdateComment {
            content: "é".repeat(MAX_CONTENT_LENGTH + 1),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn list_query_defaults() {
        let query: ListComments = serde_json::from_str(r#"{ "postId": "p1" }"#).unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, DEFAULT_PAGE_SIZE);
        assert!(query.validate().is_ok());

        let query: ListComments =
            serde_json::from_str(r#"{ "postId": "p1", "limit": 500 }"#).unwrap();
        assert!(query.validate().is_err());
    }

    #[test]
    fn list_query_bounds_the_page() {
        let query: ListComments =
            serde_json::from_str(r#"{ "postId": "p1", "page": 1000000 }"#).unwrap();
        assert!(query.validate().is_ok());

        let query: ListComments =
            serde_json::from_str(r#"{ "postId": "p1", "page": 1000000000000000000 }"#).unwrap();
        assert!(query.validate().is_err());

        let query: ListComments = serde_json::from_str(r#"{ "postId": "p1", "page": 0 }"#).unwrap();
        assert!(query.validate().is_err());
    }
}
