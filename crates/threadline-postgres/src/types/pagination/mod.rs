//! Pagination types for database queries.

mod offset;

pub use offset::{OffsetPage, OffsetPagination};
