//! Reqwest-based HTTP client for the post and user services.

use std::sync::Arc;
use std::time::Instant;

use reqwest::{Client, StatusCode};
use url::Url;

use super::{Error, ReqwestConfig, TRACING_TARGET};
use crate::types::CurrentUserResponse;
use crate::{
    CommentCountUpdate, PostProvider, PostService, RemoteUser, ServiceHealth, UserProvider,
    UserService,
};

struct ReqwestClientInner {
    http: Client,
    config: ReqwestConfig,
    post_base: Url,
    user_base: Url,
}

/// HTTP client for the post service (`/api/v1/posts`) and the user service
/// (`/api/v1/me`).
///
/// Implements both [`PostProvider`] and [`UserProvider`]; clones share the
/// same connection pool.
#[derive(Clone)]
pub struct ReqwestClient {
    inner: Arc<ReqwestClientInner>,
}

impl std::fmt::Debug for ReqwestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a service URL does not parse or the
    /// underlying HTTP client cannot be built.
    pub fn new(config: ReqwestConfig) -> crate::Result<Self> {
        let post_base = config.post_service_base()?;
        let user_base = config.user_service_base()?;
        let timeout = config.timeout();

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(config.effective_user_agent())
            .build()
            .map_err(Error::from)?;

        tracing::debug!(
            target: TRACING_TARGET,
            post_service = %post_base,
            user_service = %user_base,
            timeout_ms = timeout.as_millis(),
            "Upstream client created"
        );

        Ok(Self {
            inner: Arc::new(ReqwestClientInner {
                http,
                config,
                post_base,
                user_base,
            }),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &ReqwestConfig {
        &self.inner.config
    }

    /// Converts this client into a [`PostService`].
    pub fn into_post_service(self) -> PostService {
        PostService::new(self)
    }

    /// Converts this client into a [`UserService`].
    pub fn into_user_service(self) -> UserService {
        UserService::new(self)
    }

    /// Appends percent-encoded path segments to a base URL.
    fn endpoint(base: &Url, segments: &[&str]) -> crate::Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|()| crate::Error::configuration().with_message("Service URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn post_endpoint(&self, segments: &[&str]) -> crate::Result<Url> {
        Self::endpoint(&self.inner.post_base, segments)
    }

    fn user_endpoint(&self, segments: &[&str]) -> crate::Result<Url> {
        Self::endpoint(&self.inner.user_base, segments)
    }
}

fn unexpected_status(status: StatusCode, what: &str) -> crate::Error {
    crate::Error::invalid_response().with_message(format!("{what} answered with status {status}"))
}

#[async_trait::async_trait]
impl PostProvider for ReqwestClient {
    async fn verify_post(&self, post_id: &str) -> crate::Result<()> {
        let url = self.post_endpoint(&["api", "v1", "posts", post_id])?;
        let response = self
            .inner
            .http
            .get(url)
            .send()
            .await
            .map_err(Error::from)?;

        let status = response.status();
        tracing::debug!(target: TRACING_TARGET, post_id, %status, "Post existence checked");

        match status {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => {
                Err(crate::Error::not_found().with_message(format!("Post {post_id} not found")))
            }
            s => Err(unexpected_status(s, "Post service")),
        }
    }

    async fn adjust_comment_count(&self, update: &CommentCountUpdate) -> crate::Result<()> {
        let url = self.post_endpoint(&[
            "api",
            "v1",
            "posts",
            &update.post_id,
            "update-comment-count",
        ])?;

        let response = self
            .inner
            .http
            .post(url)
            .json(update)
            .send()
            .await
            .map_err(Error::from)?;

        let status = response.status();
        tracing::debug!(
            target: TRACING_TARGET,
            post_id = %update.post_id,
            increment = update.increment,
            %status,
            "Comment count update sent"
        );

        match status {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(crate::Error::not_found()
                .with_message(format!("Post {} not found", update.post_id))),
            s => Err(unexpected_status(s, "Post service")),
        }
    }

    async fn health_check(&self) -> crate::Result<ServiceHealth> {
        let url = self.post_endpoint(&["health"])?;
        let started = Instant::now();

        let health = match self.inner.http.get(url).send().await {
            Ok(response) if response.status().is_success() => ServiceHealth::healthy(),
            Ok(response) => {
                ServiceHealth::unhealthy(format!("Post service answered {}", response.status()))
            }
            Err(error) => ServiceHealth::unhealthy(error.to_string()),
        };

        Ok(health.with_response_time(started.elapsed()))
    }
}

#[async_trait::async_trait]
impl UserProvider for ReqwestClient {
    async fn current_user(&self, bearer: &str) -> crate::Result<RemoteUser> {
        let url = self.user_endpoint(&["api", "v1", "me"])?;
        let response = self
            .inner
            .http
            .get(url)
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(Error::from)?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(target: TRACING_TARGET, %status, "User service rejected token");
            return Err(crate::Error::unauthorized()
                .with_message(format!("User service answered with status {status}")));
        }

        let bytes = response.bytes().await.map_err(Error::from)?;
        let body: CurrentUserResponse = serde_json::from_slice(&bytes).map_err(Error::from)?;
        Ok(body.user)
    }
}
