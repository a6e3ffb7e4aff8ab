//! Service health handler.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;

use crate::extract::Json;
use crate::handler::response::{DatabaseState, MonitorStatus, UpstreamState};
use crate::service::{CommentService, ServiceState};

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "threadline_server::handler::monitors";

/// Reports whether the comment database and the post service are reachable.
#[tracing::instrument(skip_all)]
async fn health_status(
    State(comments): State<CommentService>,
) -> (StatusCode, Json<MonitorStatus>) {
    let database = match comments.check_store().await {
        Ok(()) => DatabaseState::Connected,
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                "Comment store health check failed"
            );
            DatabaseState::Disconnected
        }
    };

    let posts = comments.check_post_service().await;
    let post_service = if posts.is_healthy() {
        UpstreamState::Reachable
    } else {
        tracing::warn!(
            target: TRACING_TARGET,
            reason = posts.message.as_deref().unwrap_or_default(),
            response = ?posts.response,
            "Post service health check failed"
        );
        UpstreamState::Unreachable
    };

    let status = MonitorStatus::new(database, post_service);
    let status_code = if status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    tracing::debug!(
        target: TRACING_TARGET,
        status_code = status_code.as_u16(),
        "Health status response prepared"
    );

    (status_code, Json(status))
}

fn health_status_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Health status")
        .description("Reports the state of the comment database and of the post service.")
        .response_with::<200, Json<MonitorStatus>, _>(|res| res.description("Service is healthy."))
        .response_with::<503, Json<MonitorStatus>, _>(|res| {
            res.description("The comment database or the post service is unreachable.")
        })
}

/// Returns an [`ApiRouter`] with the health route.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/health", get_with(health_status, health_status_docs))
        .with_path_items(|item| item.tag("Monitors"))
}

#[cfg(test)]
mod tests {
    use threadline_postgres::model::{Comment, NewComment};
    use threadline_postgres::query::LikeToggle;
    use threadline_postgres::types::{OffsetPage, OffsetPagination};
    use uuid::Uuid;

    use super::*;
    use crate::handler::test::{TestApp, create_test_server_with_state};
    use crate::service::{CommentStore, CommentStoreHandle, IdentityVerifier};

    /// Store whose database is always down.
    struct UnreachableStore;

    fn down() -> crate::Error {
        crate::Error::unavailable("postgres", "Database is unavailable")
    }

    #[async_trait::async_trait]
    impl CommentStore for UnreachableStore {
        async fn create(&self, _: NewComment) -> crate::Result<Comment> {
            Err(down())
        }

        async fn find(&self, _: Uuid) -> crate::Result<Option<Comment>> {
            Err(down())
        }

        async fn list_active(
            &self,
            _: &str,
            _: OffsetPagination,
        ) -> crate::Result<OffsetPage<Comment>> {
            Err(down())
        }

        async fn update_content(&self, _: Uuid, _: String) -> crate::Result<Option<Comment>> {
            Err(down())
        }

        async fn soft_delete(&self, _: Uuid) -> crate::Result<Option<Comment>> {
            Err(down())
        }

        async fn toggle_like(&self, _: Uuid, _: &str) -> crate::Result<Option<LikeToggle>> {
            Err(down())
        }

        async fn ping(&self) -> crate::Result<()> {
            Err(down())
        }
    }

    #[tokio::test]
    async fn healthy_when_database_answers() -> anyhow::Result<()> {
        let app = TestApp::new()?;

        let response = app.server.get("/health").await;
        response.assert_status_ok();

        let status = response.json::<serde_json::Value>();
        assert_eq!(status["status"], "OK");
        assert_eq!(status["database"], "connected");
        assert_eq!(status["postService"], "reachable");
        assert_eq!(status["service"], "threadline-server");
        assert!(status["timestamp"].is_string());
        Ok(())
    }

    #[tokio::test]
    async fn degraded_when_database_is_down() -> anyhow::Result<()> {
        let posts = threadline_upstream::mock::MockProvider::new().into_post_service();
        let store = CommentStoreHandle::new(UnreachableStore);
        let state = ServiceState::from_parts(
            CommentService::new(store, posts),
            IdentityVerifier::local("secret"),
        );
        let server = create_test_server_with_state(state)?;

        let response = server.get("/health").await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

        let status = response.json::<serde_json::Value>();
        assert_eq!(status["status"], "DEGRADED");
        assert_eq!(status["database"], "disconnected");
        Ok(())
    }

    #[tokio::test]
    async fn degraded_when_post_service_is_down() -> anyhow::Result<()> {
        let app = TestApp::new()?;
        app.posts.set_unreachable(true);

        let response = app.server.get("/health").await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

        let status = response.json::<serde_json::Value>();
        assert_eq!(status["status"], "DEGRADED");
        assert_eq!(status["database"], "connected");
        assert_eq!(status["postService"], "unreachable");
        Ok(())
    }

    #[tokio::test]
    async fn unavailable_store_maps_to_503() -> anyhow::Result<()> {
        let posts = threadline_upstream::mock::MockProvider::new().into_post_service();
        let store = CommentStoreHandle::new(UnreachableStore);
        let state = ServiceState::from_parts(
            CommentService::new(store, posts),
            IdentityVerifier::local("secret"),
        );
        let server = create_test_server_with_state(state)?;

        let response = server.get("/comments").add_query_param("postId", "p1").await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            response.json::<serde_json::Value>()["name"],
            "service_unavailable"
        );
        Ok(())
    }
}
