//! Path parameter extractor.

use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequestParts, Path as AxumPath};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;

use super::sanitize_error_message;
use crate::handler::{Error, ErrorKind};

/// Path parameter extractor rejecting malformed segments with `400`.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Path<T>(pub T);

impl<T> Path<T> {
    /// Returns the inner path parameters.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let extractor =
            <AxumPath<T> as FromRequestParts<S>>::from_request_parts(parts, state).await;
        extractor.map(|x| Self(x.0)).map_err(Into::into)
    }
}

impl From<PathRejection> for Error<'static> {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(err) => {
                let message = err.body_text();
                let error = ErrorKind::BadRequest
                    .with_message("Invalid path parameter format")
                    .with_context(sanitize_error_message(&message, 2, 150));

                match deserialization_hint(&message) {
                    Some(hint) => error.with_suggestion(hint),
                    None => error,
                }
            }
            PathRejection::MissingPathParams(err) => ErrorKind::BadRequest
                .with_message("Required path parameter missing")
                .with_context(sanitize_error_message(&err.body_text(), 2, 150)),
            other => ErrorKind::InternalServerError
                .with_message("Path processing failed")
                .with_context(format!("Unexpected path rejection: {other:?}")),
        }
    }
}

/// Returns a format hint for well known parameter types.
fn deserialization_hint(message: &str) -> Option<&'static str> {
    let message = message.to_lowercase();
    if message.contains("uuid") || message.contains("invalid character") {
        Some("Identifiers must be UUIDs: xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx")
    } else if message.contains("invalid digit") || message.contains("cannot parse") {
        Some("Numeric parameters must contain only digits")
    } else {
        None
    }
}

impl<T> aide::OperationInput for Path<T>
where
    T: schemars::JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        AxumPath::<T>::operation_input(ctx, operation);
    }

    fn inferred_early_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        AxumPath::<T>::inferred_early_responses(ctx, operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_name_the_expected_format() {
        assert!(deserialization_hint("UUID parsing failed: invalid character").is_some());
        assert!(deserialization_hint("cannot parse `abc` to a `u64`").is_some());
        assert!(deserialization_hint("something else").is_none());
    }
}
