//! Centralized tracing target constants for structured logging.
//!
//! Every module that emits events names its target here, so log output can
//! be filtered per concern through the subscriber's `EnvFilter`.

/// Bearer credential verification, local and remote.
pub const TRACING_TARGET_AUTHENTICATION: &str = "threadline_server::authentication";

/// Ownership and role checks on comment mutations.
pub const TRACING_TARGET_AUTHORIZATION: &str = "threadline_server::authorization";

/// Comment service orchestration.
pub const TRACING_TARGET_COMMENTS: &str = "threadline_server::comments";

/// Fire-and-forget comment counter updates sent to the post service.
pub const TRACING_TARGET_COUNTER: &str = "threadline_server::comments::counter";

/// Error recovery including middleware errors and request failures.
pub const TRACING_TARGET_RECOVERY_ERROR: &str = "threadline_server::recovery::error";

/// Panic recovery including handler panics and service failures.
pub const TRACING_TARGET_RECOVERY_PANIC: &str = "threadline_server::recovery::panic";

/// Service configuration and dependency wiring.
pub const TRACING_TARGET_CONFIG: &str = "threadline_server::config";
