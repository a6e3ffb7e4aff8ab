//! Reqwest-based HTTP client for the post and user services.
//!
//! ```rust,ignore
//! use threadline_upstream::reqwest::{ReqwestClient, ReqwestConfig};
//!
//! let client = ReqwestClient::new(ReqwestConfig::default())?;
//! let posts = client.clone().into_post_service();
//! let users = client.into_user_service();
//! ```

mod client;
mod config;
mod error;

pub use client::ReqwestClient;
pub use config::ReqwestConfig;
pub use error::{Error, Result};

/// Tracing target for reqwest client operations.
pub const TRACING_TARGET: &str = "threadline_upstream::reqwest";
