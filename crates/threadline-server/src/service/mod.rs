//! Application state and dependency injection.

mod comments;
mod config;
mod identity;
mod state;

pub use crate::service::comments::{
    CommentNode, CommentService, CommentStore, CommentStoreHandle, CommentThread, PgCommentStore,
    build_tree,
};
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use crate::service::comments::MemoryCommentStore;
pub use crate::service::config::{ServiceConfig, ServiceConfigBuilder};
pub use crate::service::identity::{
    Identity, IdentityClaims, IdentityMode, IdentityProvider, IdentityVerifier, LocalIdentity,
    RemoteIdentity, Role,
};
pub use crate::service::state::ServiceState;
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};
