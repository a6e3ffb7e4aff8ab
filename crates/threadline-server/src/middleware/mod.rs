//! Middleware for `axum::Router` and HTTP request processing.
//!
//! Each concern is an extension trait on [`Router`]:
//!
//! - [`RouterObservabilityExt`]: request ids, sensitive headers, request spans.
//! - [`RouterRecoveryExt`]: panics and timeouts rendered as JSON errors.
//! - [`RouterSecurityExt`]: CORS, security headers and body limits.
//! - [`RouterOpenApiExt`]: OpenAPI document and Scalar UI.
//!
//! ```rust,no_run
//! use axum::Router;
//! use threadline_server::middleware::{
//!     RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
//! };
//!
//! let app: Router = Router::new()
//!     .with_recovery(&RecoveryConfig::default())
//!     .with_observability()
//!     .with_default_security();
//! ```
//!
//! [`Router`]: axum::Router

mod observability;
mod recovery;
mod security;
mod specification;

pub use observability::RouterObservabilityExt;
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{
    CorsConfig, FrameOptions, ReferrerPolicy, RouterSecurityExt, SecurityHeadersConfig,
};
pub(crate) use specification::BEARER_SCHEME;
pub use specification::{OpenApiConfig, RouterOpenApiExt};
