//! HTTP server startup and lifecycle management.

mod error;
mod http_server;
mod lifecycle;
mod shutdown;

use axum::Router;
pub use error::{Result, ServerError};
use http_server::serve_http;
use lifecycle::drain_within;
use shutdown::shutdown_signal;
use threadline_server::service::ServiceState;

use crate::TRACING_TARGET_SERVER_SHUTDOWN;
use crate::config::ServerConfig;

/// Serves `app` until shutdown, then waits for pending post counter updates.
///
/// Counter updates run detached from requests, so they are drained
/// separately once the server stopped accepting connections.
pub async fn serve(app: Router, config: &ServerConfig, state: &ServiceState) -> Result<()> {
    let served = serve_http(app, config).await;

    let comments = state.comments();
    let flushed = drain_within(
        "post counter updates",
        config.shutdown_timeout(),
        comments.flush_counter_updates(),
    )
    .await;

    if !flushed {
        tracing::warn!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "Some post comment counters may not have been updated"
        );
    }

    served
}
