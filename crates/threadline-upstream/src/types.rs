//! Payloads exchanged with the post and user services.

use std::time::Duration;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A comment count delta sent to the post service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentCountUpdate {
    /// Post whose counter is adjusted.
    #[serde(skip)]
    pub post_id: String,
    /// `1` after a comment is created, `-1` after it is deleted.
    pub increment: i32,
}

impl CommentCountUpdate {
    /// Counter update for a newly created comment.
    pub fn increment(post_id: impl Into<String>) -> Self {
        Self {
            post_id: post_id.into(),
            increment: 1,
        }
    }

    /// Counter update for a deleted comment.
    pub fn decrement(post_id: impl Into<String>) -> Self {
        Self {
            post_id: post_id.into(),
            increment: -1,
        }
    }
}

/// Caller identity as reported by the user service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteUser {
    /// User identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Role name, `user` or `admin`.
    #[serde(default)]
    pub role: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Body of `GET /api/v1/me`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CurrentUserResponse {
    pub user: RemoteUser,
}

/// Represents the operational status of an upstream service.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceStatus {
    /// Service is operating normally
    #[default]
    Healthy,
    /// Service is not reachable or returns errors
    Unhealthy,
}

/// Health information for an upstream service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceHealth {
    /// Current service status
    pub status: ServiceStatus,
    /// Response time for the health check
    pub response: Option<Duration>,
    /// Optional message describing the current state
    pub message: Option<String>,
    /// Timestamp when the health check was performed
    pub checked_at: Timestamp,
}

impl ServiceHealth {
    /// Creates a healthy report.
    pub fn healthy() -> Self {
        Self {
            status: ServiceStatus::Healthy,
            response: None,
            message: None,
            checked_at: Timestamp::now(),
        }
    }

    /// Creates an unhealthy report.
    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: ServiceStatus::Unhealthy,
            response: None,
            message: Some(message.into()),
            checked_at: Timestamp::now(),
        }
    }

    /// Sets the response time for this health check.
    pub fn with_response_time(mut self, response_time: Duration) -> Self {
        self.response = Some(response_time);
        self
    }

    /// Returns whether the service is healthy.
    pub fn is_healthy(&self) -> bool {
        self.status == ServiceStatus::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_update_body_only_carries_increment() {
        let update = CommentCountUpdate::decrement("p1");
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body, serde_json::json!({ "increment": -1 }));
        assert_eq!(CommentCountUpdate::increment("p1").increment, 1);
    }

    #[test]
    fn current_user_tolerates_missing_fields() {
        let body = r#"{ "user": { "id": "u1", "role": "admin" } }"#;
        let response: CurrentUserResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.user.id, "u1");
        assert_eq!(response.user.role.as_deref(), Some("admin"));
        assert!(response.user.name.is_none());
    }

    #[test]
    fn health_reports() {
        assert!(ServiceHealth::healthy().is_healthy());
        let health = ServiceHealth::unhealthy("down");
        assert!(!health.is_healthy());
        assert_eq!(health.message.as_deref(), Some("down"));
    }
}
