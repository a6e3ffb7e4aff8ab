//! Prelude module for threadline-server.
//!
//! ```rust
//! use threadline_server::prelude::*;
//! ```

pub use crate::extract::*;
pub use crate::handler::routes;
pub use crate::middleware::*;
pub use crate::service::*;
