//! Database query repositories.
//!
//! Repositories are extension traits implemented for [`PgConnection`], so
//! they are available on any pooled connection obtained from [`PgClient`].
//!
//! [`PgConnection`]: crate::PgConnection
//! [`PgClient`]: crate::PgClient

mod comment;

pub use comment::{CommentRepository, LikeToggle};
