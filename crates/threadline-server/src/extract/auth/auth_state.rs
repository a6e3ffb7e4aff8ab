//! Verified caller identity extractor.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use derive_more::Deref;

use super::AuthHeader;
use crate::handler::Error;
use crate::service::{Identity, IdentityProvider, IdentityVerifier};

/// Authenticated caller of the request.
///
/// Extraction reads the bearer credential with [`AuthHeader`] and verifies it
/// with the [`IdentityVerifier`] taken from the router state. The verified
/// identity is cached in the request extensions, so extracting it twice
/// verifies once.
#[derive(Debug, Clone, Deref, PartialEq, Eq)]
pub struct AuthState(pub Identity);

impl<S> FromRequestParts<S> for AuthState
where
    S: Sync + Send,
    IdentityVerifier: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth_state) = parts.extensions.get::<Self>() {
            return Ok(auth_state.clone());
        }

        let auth_header = AuthHeader::from_request_parts(parts, state).await?;
        let verifier = IdentityVerifier::from_ref(state);
        let identity = verifier.verify(auth_header.token()).await?;

        let auth_state = Self(identity);
        parts.extensions.insert(auth_state.clone());
        Ok(auth_state)
    }
}

impl aide::OperationInput for AuthState {}
