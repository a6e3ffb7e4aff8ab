//! Request extractors for the comment API.
//!
//! - [`AuthState`] authenticates the caller from a bearer credential.
//! - [`Json`], [`ValidateJson`], [`Path`] and [`Query`] replace the axum
//!   extractors of the same name and reject with the JSON error format.

mod auth;
mod reject;

pub use crate::extract::auth::{AuthHeader, AuthState};
pub use crate::extract::reject::{Json, Path, Query, ValidateJson};
