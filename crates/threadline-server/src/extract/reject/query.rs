//! Query string extractor.

use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRequestParts, Query as AxumQuery};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;

use crate::handler::{Error, ErrorKind};

/// Query string extractor rejecting missing or malformed parameters with `400`.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Query<T>(pub T);

impl<T> Query<T> {
    /// Consumes the wrapper and returns the inner query parameters.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AxumQuery::<T>::from_request_parts(parts, state).await {
            Ok(AxumQuery(query)) => Ok(Query(query)),
            Err(rejection) => Err(rejection.into()),
        }
    }
}

impl From<QueryRejection> for Error<'static> {
    fn from(rejection: QueryRejection) -> Self {
        let QueryRejection::FailedToDeserializeQueryString(err) = rejection else {
            return ErrorKind::BadRequest.with_message("Invalid query parameters");
        };

        let message = err.body_text();
        let field = extract_field_name(&message).map(ToOwned::to_owned);

        if message.contains("missing field") {
            let field = field.unwrap_or_else(|| "unknown".to_owned());
            ErrorKind::BadRequest
                .with_message(format!("Missing required query parameter '{field}'"))
                .with_context(message)
        } else if message.contains("duplicate field") {
            let field = field.unwrap_or_else(|| "unknown".to_owned());
            ErrorKind::BadRequest
                .with_message(format!("Duplicate query parameter '{field}'"))
                .with_context(message)
        } else {
            ErrorKind::BadRequest
                .with_message("Invalid query parameters")
                .with_context(message)
        }
    }
}

/// Extracts the field name from a serde error message, if present.
fn extract_field_name(message: &str) -> Option<&str> {
    let start = message.find('`')? + 1;
    let end = message[start..].find('`')?;
    Some(&message[start..start + end])
}

impl<T> aide::OperationInput for Query<T>
where
    T: schemars::JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        AxumQuery::<T>::operation_input(ctx, operation);
    }

    fn inferred_early_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        AxumQuery::<T>::inferred_early_responses(ctx, operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_backticked_field_names() {
        assert_eq!(extract_field_name("missing field `postId`"), Some("postId"));
        assert_eq!(extract_field_name("invalid digit found in string"), None);
    }
}
