//! Service error to HTTP error conversion.

use super::http_error::{Error as HttpError, ErrorKind};
use crate::ErrorKind as ServiceErrorKind;
use crate::utility::tracing_targets::TRACING_TARGET_RECOVERY_ERROR;

impl From<crate::Error> for HttpError<'static> {
    fn from(error: crate::Error) -> Self {
        let message = error.message().to_owned();
        let resource = error.resource().map(ToOwned::to_owned);
        let source = std::error::Error::source(&error).map(ToString::to_string);

        let http_error = match error.kind() {
            ServiceErrorKind::InvalidArgument => ErrorKind::BadRequest.with_message(message),
            ServiceErrorKind::Unauthorized => ErrorKind::Unauthorized
                .with_message(message)
                .with_suggestion("Provide a valid bearer token in the Authorization header"),
            ServiceErrorKind::Forbidden => ErrorKind::Forbidden.with_message(message),
            ServiceErrorKind::NotFound => ErrorKind::NotFound.with_message(message),
            ServiceErrorKind::Unavailable => {
                tracing::warn!(
                    target: TRACING_TARGET_RECOVERY_ERROR,
                    error = %error,
                    source = ?source,
                    "Dependency unavailable"
                );
                ErrorKind::ServiceUnavailable
                    .with_context(message)
                    .with_suggestion("Retry the request later")
            }
            ServiceErrorKind::Config | ServiceErrorKind::Internal => {
                tracing::error!(
                    target: TRACING_TARGET_RECOVERY_ERROR,
                    error = %error,
                    source = ?source,
                    "Service operation failed"
                );
                ErrorKind::InternalServerError.with_context(message)
            }
        };

        match resource {
            Some(resource) => http_error.with_resource(resource),
            None => http_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn domain_errors_keep_their_message() {
        let error = HttpError::from(Error::invalid_argument("Maximum comment depth exceeded"));
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.message(), Some("Maximum comment depth exceeded"));

        let error = HttpError::from(Error::not_found("parent comment"));
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.resource(), Some("parent comment"));
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let error = HttpError::from(Error::internal("postgres", "Database operation failed"));
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert!(error.message().is_none());
        assert!(error.context().is_some_and(|c| c.contains("postgres")));

        let error = HttpError::from(Error::unavailable("postgres", "Database is unavailable"));
        assert_eq!(error.kind(), ErrorKind::ServiceUnavailable);
        assert!(error.message().is_none());
    }
}
