//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! ```rust,no_run
//! use threadline_server::handler::routes;
//! use threadline_server::middleware::{OpenApiConfig, RouterOpenApiExt};
//! use threadline_server::service::{ServiceConfig, ServiceState};
//!
//! # async fn example(config: ServiceConfig) -> anyhow::Result<()> {
//! let state = ServiceState::from_config(&config).await?;
//! let app: axum::Router = routes()
//!     .with_open_api(&OpenApiConfig::default())
//!     .with_state(state);
//! # Ok(())
//! # }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod comments;
mod error;
mod monitors;
pub mod request;
pub mod response;

use aide::axum::ApiRouter;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns an [`ApiRouter`] with every route of the service.
///
/// `GET /comments` and `GET /health` are public; the remaining comment
/// routes authenticate the caller through their extractors. Unknown paths
/// answer `404 not_found`.
pub fn routes() -> ApiRouter<ServiceState> {
    ApiRouter::new()
        .merge(comments::routes())
        .merge(monitors::routes())
        .fallback(handler)
}

#[cfg(test)]
pub(crate) mod test {
    use axum_test::TestServer;
    use threadline_upstream::mock::MockProvider;

    use crate::handler::routes;
    use crate::middleware::{OpenApiConfig, RouterOpenApiExt};
    use crate::service::{
        CommentService, CommentStoreHandle, IdentityClaims, IdentityVerifier, MemoryCommentStore,
        ServiceState,
    };

    /// Secret used to sign test tokens.
    pub const TEST_SECRET: &str = "test-secret";

    /// Posts known to the mock post service.
    pub const KNOWN_POSTS: [&str; 2] = ["p1", "p2"];

    /// Returns a [`TestServer`] serving every route over `state`.
    pub fn create_test_server_with_state(state: ServiceState) -> anyhow::Result<TestServer> {
        let app = routes()
            .with_open_api(&OpenApiConfig::default())
            .with_state(state);
        let server = TestServer::new(app)?;
        Ok(server)
    }

    /// Test server over an in-memory store and a mock post service.
    pub struct TestApp {
        pub server: TestServer,
        pub store: MemoryCommentStore,
        pub posts: MockProvider,
        pub comments: CommentService,
    }

    impl TestApp {
        /// Creates an app knowing [`KNOWN_POSTS`] and verifying tokens signed
        /// with [`TEST_SECRET`].
        pub fn new() -> anyhow::Result<Self> {
            let posts = KNOWN_POSTS
                .into_iter()
                .fold(MockProvider::new(), MockProvider::with_post);
            let store = MemoryCommentStore::new();

            let comments = CommentService::new(
                CommentStoreHandle::new(store.clone()),
                posts.clone().into_post_service(),
            );
            let identity = IdentityVerifier::local(TEST_SECRET);
            let state = ServiceState::from_parts(comments.clone(), identity);

            Ok(Self {
                server: create_test_server_with_state(state)?,
                store,
                posts,
                comments,
            })
        }

        /// Signs a token for a user with a display name.
        pub fn token(&self, user_id: &str) -> anyhow::Result<String> {
            let claims = IdentityClaims::new(user_id, 3600).with_name(format!("User {user_id}"));
            Ok(claims.sign(TEST_SECRET)?)
        }

        /// Signs a token for an administrator.
        pub fn admin_token(&self, user_id: &str) -> anyhow::Result<String> {
            let claims = IdentityClaims::new(user_id, 3600).with_role("admin");
            Ok(claims.sign(TEST_SECRET)?)
        }
    }

    #[tokio::test]
    async fn handlers() -> anyhow::Result<()> {
        let app = TestApp::new()?;
        assert!(app.server.is_running());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_paths_are_not_found() -> anyhow::Result<()> {
        let app = TestApp::new()?;

        let response = app.server.get("/nope").await;
        response.assert_status_not_found();
        assert_eq!(response.json::<serde_json::Value>()["name"], "not_found");
        Ok(())
    }

    #[tokio::test]
    async fn openapi_document_lists_comment_routes() -> anyhow::Result<()> {
        let app = TestApp::new()?;

        let response = app.server.get("/api/openapi.json").await;
        response.assert_status_ok();

        let document = response.json::<serde_json::Value>();
        let paths = &document["paths"];
        assert!(paths["/comments"]["post"].is_object());
        assert!(paths["/comments"]["get"].is_object());
        assert!(paths["/comments/{id}"]["put"].is_object());
        assert!(paths["/comments/{id}"]["delete"].is_object());
        assert!(paths["/comments/{id}/like"]["post"].is_object());
        assert!(paths["/health"]["get"].is_object());
        Ok(())
    }
}
