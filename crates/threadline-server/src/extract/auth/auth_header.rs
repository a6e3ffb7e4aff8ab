//! Bearer credential extraction from the `Authorization` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejectionReason;

use crate::handler::{Error, ErrorKind};
use crate::utility::tracing_targets::TRACING_TARGET_AUTHENTICATION;

/// Unverified bearer credential of the request.
///
/// Rejects with `401 unauthorized` ("Access token required") when the header
/// is absent, uses another scheme, or carries an empty token.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeader(String);

impl AuthHeader {
    /// Returns the raw bearer token.
    #[inline]
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AuthHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AuthHeader").field(&"[REDACTED]").finish()
    }
}

fn token_required() -> Error<'static> {
    ErrorKind::Unauthorized
        .with_message("Access token required")
        .with_resource("authentication")
}

impl<S> FromRequestParts<S> for AuthHeader
where
    S: Sync + Send,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        type AuthBearerHeader = TypedHeader<Authorization<Bearer>>;

        match AuthBearerHeader::from_request_parts(parts, state).await {
            Ok(TypedHeader(header)) if !header.token().trim().is_empty() => {
                Ok(Self(header.token().to_owned()))
            }
            Ok(_) => Err(token_required().with_context("Bearer token is empty")),
            Err(rejection) => {
                tracing::debug!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    reason = %rejection,
                    "Missing or malformed authorization header"
                );

                let context = match rejection.reason() {
                    TypedHeaderRejectionReason::Missing => "Missing Authorization header",
                    _ => "Authorization header must use the Bearer scheme",
                };
                Err(token_required().with_context(context))
            }
        }
    }
}

impl aide::OperationInput for AuthHeader {}
