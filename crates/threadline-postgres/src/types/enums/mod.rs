//! Database enumeration types for type-safe queries.
//!
//! Each enumeration corresponds to a PostgreSQL ENUM type defined in the
//! migrations and provides serialization support for APIs.

mod comment_status;

pub use comment_status::CommentStatus;
