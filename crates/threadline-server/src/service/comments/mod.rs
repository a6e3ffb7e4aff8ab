//! Threaded comments: storage seam, reply tree and the orchestrating service.

#[cfg(any(test, feature = "test-utils"))]
mod memory_store;
mod pg_store;
mod service;
mod store;
mod tree;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use self::memory_store::MemoryCommentStore;
pub use self::pg_store::PgCommentStore;
pub use self::service::{CommentService, CommentThread};
pub use self::store::{CommentStore, CommentStoreHandle};
pub use self::tree::{CommentNode, build_tree};
