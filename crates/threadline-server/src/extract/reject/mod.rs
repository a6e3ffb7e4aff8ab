//! Request extractors that reject with the JSON error format.
//!
//! Drop-in replacements for the axum extractors of the same name. Every
//! rejection renders as an [`Error`] instead of axum's plain-text bodies.
//!
//! [`Error`]: crate::handler::Error

mod json;
mod path;
mod query;
mod validated_json;

pub use self::json::Json;
pub use self::path::Path;
pub use self::query::Query;
pub use self::validated_json::ValidateJson;

/// Shortens extractor error messages before they are attached as context.
fn sanitize_error_message(message: &str, max_lines: usize, max_chars: usize) -> String {
    message
        .lines()
        .take(max_lines)
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(max_chars)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_limits_lines_and_length() {
        let message = "first line\nsecond line\nthird line";
        assert_eq!(sanitize_error_message(message, 2, 100), "first line second line");
        assert_eq!(sanitize_error_message(message, 3, 5), "first");
    }
}
