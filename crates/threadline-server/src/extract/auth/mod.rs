//! Bearer authentication extractors.
//!
//! - [`AuthHeader`] reads the raw bearer credential from `Authorization`.
//! - [`AuthState`] verifies it with the [`IdentityVerifier`] of the router
//!   state and yields the caller [`Identity`].
//!
//! [`IdentityVerifier`]: crate::service::IdentityVerifier
//! [`Identity`]: crate::service::Identity

mod auth_header;
mod auth_state;

pub use self::auth_header::AuthHeader;
pub use self::auth_state::AuthState;
