//! Monitor response types.

use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Overall health of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthState {
    /// Every dependency answered.
    Ok,
    /// At least one dependency failed its check.
    Degraded,
}

/// State of the comment database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum DatabaseState {
    /// The database answered the check.
    Connected,
    /// The database could not be reached.
    Disconnected,
}

/// State of the post service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum UpstreamState {
    /// The service answered its health endpoint.
    Reachable,
    /// The service could not be reached or reported a failure.
    Unreachable,
}

/// Health check response.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStatus {
    /// Overall health.
    pub status: HealthState,
    /// Timestamp when this status was generated.
    pub timestamp: Timestamp,
    /// Name of the service.
    pub service: String,
    /// Application version.
    pub version: String,
    /// Comment database state.
    pub database: DatabaseState,
    /// Post service state.
    pub post_service: UpstreamState,
}

impl MonitorStatus {
    /// Creates a status report from the dependency checks.
    ///
    /// The service is degraded as soon as one dependency is down.
    pub fn new(database: DatabaseState, post_service: UpstreamState) -> Self {
        let status = match (database, post_service) {
            (DatabaseState::Connected, UpstreamState::Reachable) => HealthState::Ok,
            _ => HealthState::Degraded,
        };

        Self {
            status,
            timestamp: Timestamp::now(),
            service: env!("CARGO_PKG_NAME").to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            database,
            post_service,
        }
    }

    /// Returns whether every dependency answered.
    pub fn is_healthy(&self) -> bool {
        self.status == HealthState::Ok
    }
}
