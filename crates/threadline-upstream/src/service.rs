//! Cloneable service handles for dependency injection.

use std::fmt;
use std::sync::Arc;

use crate::{CommentCountUpdate, PostProvider, RemoteUser, Result, ServiceHealth, UserProvider};

/// Shared handle to a [`PostProvider`].
#[derive(Clone)]
pub struct PostService {
    inner: Arc<dyn PostProvider>,
}

impl PostService {
    /// Wraps a provider into a shareable service.
    pub fn new(provider: impl PostProvider + 'static) -> Self {
        Self {
            inner: Arc::new(provider),
        }
    }
}

impl fmt::Debug for PostService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostService").finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl PostProvider for PostService {
    async fn verify_post(&self, post_id: &str) -> Result<()> {
        self.inner.verify_post(post_id).await
    }

    async fn adjust_comment_count(&self, update: &CommentCountUpdate) -> Result<()> {
        self.inner.adjust_comment_count(update).await
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        self.inner.health_check().await
    }
}

/// Shared handle to a [`UserProvider`].
#[derive(Clone)]
pub struct UserService {
    inner: Arc<dyn UserProvider>,
}

impl UserService {
    /// Wraps a provider into a shareable service.
    pub fn new(provider: impl UserProvider + 'static) -> Self {
        Self {
            inner: Arc::new(provider),
        }
    }
}

impl fmt::Debug for UserService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserService").finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl UserProvider for UserService {
    async fn current_user(&self, bearer: &str) -> Result<RemoteUser> {
        self.inner.current_user(bearer).await
    }
}
