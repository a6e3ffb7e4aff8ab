//! Middleware configuration for the HTTP server.
//!
//! Groups the CORS, OpenAPI and recovery settings exported by
//! `threadline-server`. Every option can be given as a CLI argument or an
//! environment variable.
//!
//! # Example
//!
//! ```bash
//! threadline --cors-origins "https://example.com" --request-timeout 60
//! ```

use clap::Args;
use serde::{Deserialize, Serialize};
use threadline_server::middleware::{CorsConfig, OpenApiConfig, RecoveryConfig};

use crate::TRACING_TARGET_CONFIG;

/// Middleware configuration combining CORS, OpenAPI, and recovery settings.
#[derive(Debug, Clone, Default, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// CORS (Cross-Origin Resource Sharing) configuration.
    #[clap(flatten)]
    pub cors: CorsConfig,

    /// OpenAPI documentation paths.
    #[clap(flatten)]
    pub openapi: OpenApiConfig,

    /// Serves the API without the OpenAPI document and the Scalar UI.
    #[arg(long, env = "OPENAPI_DISABLED", default_value_t = false)]
    #[serde(default)]
    pub disable_openapi: bool,

    /// Request timeout and panic recovery.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,
}

impl MiddlewareConfig {
    /// Returns whether the OpenAPI routes are mounted.
    #[must_use]
    pub const fn openapi_enabled(&self) -> bool {
        !self.disable_openapi
    }

    /// Logs middleware configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            origins = ?self.cors.allowed_origins,
            credentials = self.cors.allow_credentials,
            "CORS configuration"
        );

        if self.openapi_enabled() {
            tracing::info!(
                target: TRACING_TARGET_CONFIG,
                openapi_path = %self.openapi.open_api_json,
                scalar_path = %self.openapi.scalar_ui,
                "OpenAPI configuration"
            );
        } else {
            tracing::info!(target: TRACING_TARGET_CONFIG, "OpenAPI documentation disabled");
        }

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            request_timeout_secs = self.recovery.request_timeout,
            "Recovery configuration"
        );
    }
}
