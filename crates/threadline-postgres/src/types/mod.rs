//! Contains enumerations, pagination and other custom types.

pub mod constants;
mod enums;
mod pagination;

pub use enums::CommentStatus;
pub use pagination::{OffsetPage, OffsetPagination};
