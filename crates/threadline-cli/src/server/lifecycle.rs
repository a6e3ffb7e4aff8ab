//! Server lifecycle management.
//!
//! Wraps the running server with startup warnings, uptime tracking and
//! error reporting, and bounds the cleanup that follows a shutdown signal.

use std::future::Future;
use std::io;
use std::time::{Duration, Instant};

use crate::config::ServerConfig;
use crate::server::{Result, ServerError};
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Runs `serve_fn` to completion and reports how it ended.
pub async fn serve_with_shutdown<F>(
    server_config: &ServerConfig,
    serve_fn: impl FnOnce() -> F,
) -> Result<()>
where
    F: Future<Output = io::Result<()>>,
{
    let start_time = Instant::now();

    log_security_warnings(server_config);
    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        addr = %server_config.server_addr(),
        "Server is ready and listening for connections"
    );

    let result = serve_fn().await.map_err(ServerError::Runtime);
    handle_result(result, start_time)
}

/// Waits for `task` for at most `timeout`.
///
/// Returns `false` when the timeout elapsed first.
pub async fn drain_within<F>(what: &'static str, timeout: Duration, task: F) -> bool
where
    F: Future<Output = ()>,
{
    let started = Instant::now();
    match tokio::time::timeout(timeout, task).await {
        Ok(()) => {
            tracing::debug!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                task = what,
                elapsed_ms = started.elapsed().as_millis(),
                "Drained"
            );
            true
        }
        Err(_) => {
            tracing::warn!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                task = what,
                timeout_secs = timeout.as_secs(),
                "Shutdown timeout elapsed before draining finished"
            );
            false
        }
    }
}

fn log_security_warnings(config: &ServerConfig) {
    if config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_SERVER_STARTUP,
            "Server bound to all interfaces, ensure firewall is configured"
        );
    }
}

fn handle_result(result: Result<()>, start_time: Instant) -> Result<()> {
    let uptime = start_time.elapsed();

    match result {
        Ok(()) => {
            tracing::info!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                uptime_secs = uptime.as_secs(),
                "Shutdown completed"
            );
            Ok(())
        }
        Err(err) => {
            tracing::error!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                error = %err,
                code = err.error_code(),
                recoverable = err.is_recoverable(),
                uptime_secs = uptime.as_secs(),
                "Fatal error"
            );

            if let Some(suggestion) = err.suggestion() {
                tracing::info!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    suggestion = suggestion,
                    "Recovery suggestion"
                );
            }

            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serve_with_shutdown_success() {
        let config = ServerConfig::default();
        let result = serve_with_shutdown(&config, || async { Ok(()) }).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn serve_with_shutdown_handles_error() {
        let config = ServerConfig::default();
        let result =
            serve_with_shutdown(&config, || async { Err(io::Error::other("test error")) }).await;

        assert!(matches!(result, Err(ServerError::Runtime(_))));
    }

    #[tokio::test]
    async fn drain_within_reports_completion() {
        assert!(drain_within("noop", Duration::from_secs(1), async {}).await);
    }

    #[tokio::test(start_paused = true)]
    async fn drain_within_gives_up_after_timeout() {
        let stuck = std::future::pending::<()>();
        assert!(!drain_within("stuck", Duration::from_secs(5), stuck).await);
    }
}
