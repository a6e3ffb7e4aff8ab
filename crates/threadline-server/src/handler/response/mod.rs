//! Response types for HTTP handlers.

mod comments;
mod errors;
mod monitors;

pub use comments::*;
pub use errors::*;
pub use monitors::*;
