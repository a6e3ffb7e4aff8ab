//! Reqwest client configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::Result;

/// Default timeout for upstream requests: 10 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default post service location.
pub const DEFAULT_POST_SERVICE_URL: &str = "http://localhost:3002";

/// Default user service location.
pub const DEFAULT_USER_SERVICE_URL: &str = "http://localhost:3001";

/// Locations of the collaborating services and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ReqwestConfig {
    /// Base URL of the post service
    #[cfg_attr(
        feature = "config",
        arg(
            long = "post-service-url",
            env = "POST_SERVICE_URL",
            default_value = DEFAULT_POST_SERVICE_URL
        )
    )]
    pub post_service_url: String,

    /// Base URL of the user service
    #[cfg_attr(
        feature = "config",
        arg(
            long = "user-service-url",
            env = "USER_SERVICE_URL",
            default_value = DEFAULT_USER_SERVICE_URL
        )
    )]
    pub user_service_url: String,

    /// HTTP request timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "http-timeout", env = "HTTP_TIMEOUT", default_value = "10")
    )]
    #[serde(default = "default_timeout_secs")]
    pub http_timeout: u64,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "config",
        arg(long = "http-user-agent", env = "HTTP_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ReqwestConfig {
    fn default() -> Self {
        Self {
            post_service_url: DEFAULT_POST_SERVICE_URL.to_owned(),
            user_service_url: DEFAULT_USER_SERVICE_URL.to_owned(),
            http_timeout: default_timeout_secs(),
            user_agent: None,
        }
    }
}

impl ReqwestConfig {
    /// Creates a configuration for the given service locations.
    pub fn new(post_service_url: impl Into<String>, user_service_url: impl Into<String>) -> Self {
        Self {
            post_service_url: post_service_url.into(),
            user_service_url: user_service_url.into(),
            http_timeout: default_timeout_secs(),
            user_agent: None,
        }
    }

    /// Parses the post service base URL.
    pub fn post_service_base(&self) -> Result<Url> {
        Ok(Url::parse(&self.post_service_url)?)
    }

    /// Parses the user service base URL.
    pub fn user_service_base(&self) -> Result<Url> {
        Ok(Url::parse(&self.user_service_url)?)
    }

    /// Returns the timeout, using the default if zero.
    pub fn timeout(&self) -> Duration {
        if self.http_timeout == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.http_timeout)
        }
    }

    /// Returns the user agent, using the crate default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("threadline/{}", env!("CARGO_PKG_VERSION")))
    }

    /// Set the timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.http_timeout = timeout_secs;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}
