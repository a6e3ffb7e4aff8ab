//! Application state and dependency injection.

use crate::service::{
    CommentService, CommentStoreHandle, IdentityVerifier, PgCommentStore, ServiceConfig,
};
use crate::Result;

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    comments: CommentService,
    identity: IdentityVerifier,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Connects to the database, applies migrations and creates the clients
    /// for the post and user services.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;

        let pg_client = config.connect_postgres().await?;
        let upstream = config.create_upstream()?;
        let identity = config.create_identity_verifier(&upstream)?;

        let store = CommentStoreHandle::new(PgCommentStore::new(pg_client));
        let comments = CommentService::new(store, upstream.into_post_service());

        Ok(Self::from_parts(comments, identity))
    }

    /// Assembles state from already constructed services.
    pub fn from_parts(comments: CommentService, identity: IdentityVerifier) -> Self {
        Self { comments, identity }
    }

    /// Returns the comment service.
    pub fn comments(&self) -> &CommentService {
        &self.comments
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(comments: CommentService);
impl_di!(identity: IdentityVerifier);
