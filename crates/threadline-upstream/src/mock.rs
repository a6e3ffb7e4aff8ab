//! In-memory post and user services for tests.
//!
//! Available with the `test-utils` feature:
//!
//! ```toml
//! [dev-dependencies]
//! threadline-upstream = { workspace = true, features = ["test-utils"] }
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    CommentCountUpdate, Error, PostProvider, PostService, RemoteUser, Result, ServiceHealth,
    UserProvider, UserService,
};

#[derive(Default)]
struct MockState {
    posts: HashSet<String>,
    updates: Vec<CommentCountUpdate>,
    users: HashMap<String, RemoteUser>,
}

/// In-memory implementation of [`PostProvider`] and [`UserProvider`].
///
/// Clones share state, so a test can keep one handle for assertions while
/// the service under test owns another.
#[derive(Clone, Default)]
pub struct MockProvider {
    state: Arc<Mutex<MockState>>,
    unreachable: Arc<AtomicBool>,
}

impl MockProvider {
    /// Creates a provider that knows no posts and no users.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers a post as existing.
    pub fn with_post(self, post_id: impl Into<String>) -> Self {
        self.state().posts.insert(post_id.into());
        self
    }

    /// Registers the user returned for `token`.
    pub fn with_user(self, token: impl Into<String>, user: RemoteUser) -> Self {
        self.state().users.insert(token.into(), user);
        self
    }

    /// Makes every call fail as if the service were down.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Returns the counter updates received so far.
    pub fn count_updates(&self) -> Vec<CommentCountUpdate> {
        self.state().updates.clone()
    }

    /// Returns the net counter delta recorded for `post_id`.
    pub fn net_count(&self, post_id: &str) -> i32 {
        self.state()
            .updates
            .iter()
            .filter(|update| update.post_id == post_id)
            .map(|update| update.increment)
            .sum()
    }

    /// Converts this provider into a [`PostService`].
    pub fn into_post_service(self) -> PostService {
        PostService::new(self)
    }

    /// Converts this provider into a [`UserService`].
    pub fn into_user_service(self) -> UserService {
        UserService::new(self)
    }

    fn check_reachable(&self) -> Result<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(Error::network_error().with_message("Mock service unreachable"));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl PostProvider for MockProvider {
    async fn verify_post(&self, post_id: &str) -> Result<()> {
        self.check_reachable()?;
        if self.state().posts.contains(post_id) {
            Ok(())
        } else {
            Err(Error::not_found().with_message(format!("Post {post_id} not found")))
        }
    }

    async fn adjust_comment_count(&self, update: &CommentCountUpdate) -> Result<()> {
        self.check_reachable()?;
        self.state().updates.push(update.clone());
        Ok(())
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Ok(ServiceHealth::unhealthy("Mock service unreachable"));
        }
        Ok(ServiceHealth::healthy())
    }
}

#[async_trait::async_trait]
impl UserProvider for MockProvider {
    async fn current_user(&self, bearer: &str) -> Result<RemoteUser> {
        self.check_reachable()?;
        self.state()
            .users
            .get(bearer)
            .cloned()
            .ok_or_else(|| Error::unauthorized().with_message("Unknown token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[tokio::test]
    async fn known_posts_exist() -> anyhow::Result<()> {
        let provider = MockProvider::new().with_post("p1");
        provider.verify_post("p1").await?;

        let error = provider.verify_post("p2").await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);
        Ok(())
    }

    #[tokio::test]
    async fn counter_updates_are_recorded() -> anyhow::Result<()> {
        let provider = MockProvider::new();
        let service = provider.clone().into_post_service();

        service
            .adjust_comment_count(&CommentCountUpdate::increment("p1"))
            .await?;
        service
            .adjust_comment_count(&CommentCountUpdate::increment("p1"))
            .await?;
        service
            .adjust_comment_count(&CommentCountUpdate::decrement("p1"))
            .await?;

        assert_eq!(provider.count_updates().len(), 3);
        assert_eq!(provider.net_count("p1"), 1);
        assert_eq!(provider.net_count("p2"), 0);
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_provider_fails_calls() -> anyhow::Result<()> {
        let provider = MockProvider::new().with_post("p1");
        provider.set_unreachable(true);

        let error = provider.verify_post("p1").await.unwrap_err();
        assert!(error.is_unreachable());
        assert!(!provider.health_check().await?.is_healthy());
        Ok(())
    }

    #[tokio::test]
    async fn users_resolve_by_token() -> anyhow::Result<()> {
        let user = RemoteUser {
            id: "u1".into(),
            name: Some("Ada".into()),
            email: None,
            role: Some("admin".into()),
            avatar: None,
        };
        let users = MockProvider::new()
            .with_user("token-1", user.clone())
            .into_user_service();

        assert_eq!(users.current_user("token-1").await?, user);
        let error = users.current_user("token-2").await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unauthorized);
        Ok(())
    }
}
