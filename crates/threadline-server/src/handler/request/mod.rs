//! Request types for HTTP handlers.

mod comments;
mod paths;
mod validations;

pub use comments::*;
pub use paths::*;
