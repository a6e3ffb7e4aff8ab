//! HTTP server startup with graceful shutdown.

use std::pin::pin;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};
use crate::config::ServerConfig;
use crate::server::lifecycle::{drain_within, serve_with_shutdown};
use crate::server::{Result, ServerError, shutdown_signal};

/// Binds the configured address and serves `app` until a shutdown signal.
///
/// After the signal, in-flight requests get up to the shutdown timeout to
/// finish before the server stops waiting for them.
pub async fn serve_http(app: Router, server_config: &ServerConfig) -> Result<()> {
    server_config
        .validate()
        .map_err(|err| ServerError::invalid_config(&err))?;

    let server_addr = server_config.server_addr();
    let listener = TcpListener::bind(server_addr).await.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            addr = %server_addr,
            error = %err,
            "Failed to bind to address"
        );
        ServerError::bind_error(server_addr, err)
    })?;

    let shutdown_timeout = server_config.shutdown_timeout();
    let signalled = Arc::new(Notify::new());
    let notify = Arc::clone(&signalled);

    serve_with_shutdown(server_config, || async move {
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            shutdown_signal().await;
            notify.notify_one();
        });
        let mut server = pin!(server.into_future());

        let finished = tokio::select! {
            result = &mut server => Some(result),
            () = signalled.notified() => None,
        };

        if let Some(result) = finished {
            return result;
        }

        drain_within("connections", shutdown_timeout, async {
            if let Err(err) = server.await {
                tracing::warn!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    error = %err,
                    "Server stopped with an error while draining"
                );
            }
        })
        .await;

        Ok(())
    })
    .await
}
