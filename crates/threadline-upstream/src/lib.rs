#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod service;
mod types;

#[cfg(feature = "reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
pub mod reqwest;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

pub use error::{BoxedError, Error, ErrorKind, Result};
pub use service::{PostService, UserService};
pub use types::{CommentCountUpdate, RemoteUser, ServiceHealth, ServiceStatus};

/// Tracing target for upstream service calls.
pub const TRACING_TARGET: &str = "threadline_upstream";

/// Access to the post service.
///
/// Covers the existence check performed before a comment is created and the
/// denormalized comment counter the post service keeps per post.
#[async_trait::async_trait]
pub trait PostProvider: Send + Sync {
    /// Confirms that the post exists.
    ///
    /// Returns a [`ErrorKind::NotFound`] error when the post service reports
    /// the post as absent.
    async fn verify_post(&self, post_id: &str) -> Result<()>;

    /// Adjusts the comment counter of a post by `update.increment`.
    async fn adjust_comment_count(&self, update: &CommentCountUpdate) -> Result<()>;

    /// Performs a health check on the post service.
    async fn health_check(&self) -> Result<ServiceHealth>;
}

/// Access to the user service.
#[async_trait::async_trait]
pub trait UserProvider: Send + Sync {
    /// Resolves the identity behind a bearer token.
    ///
    /// Returns an [`ErrorKind::Unauthorized`] error when the user service
    /// rejects the token.
    async fn current_user(&self, bearer: &str) -> Result<RemoteUser>;
}
