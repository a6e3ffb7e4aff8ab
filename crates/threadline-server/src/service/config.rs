//! Service configuration and dependency construction.

use std::fmt;

#[cfg(feature = "config")]
use clap::Args;
use derive_builder::Builder;
use threadline_postgres::{PgClient, PgClientMigrationExt, PgConfig};
use threadline_upstream::reqwest::{ReqwestClient, ReqwestConfig};

use crate::service::{IdentityMode, IdentityVerifier};
use crate::utility::tracing_targets::TRACING_TARGET_CONFIG;
use crate::{Error, Result};

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Clone, Builder)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
#[builder(
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(validate = "Self::validate")
)]
pub struct ServiceConfig {
    /// Comment store database.
    #[cfg_attr(feature = "config", command(flatten))]
    pub postgres_config: PgConfig,

    /// Post and user service endpoints.
    #[cfg_attr(feature = "config", command(flatten))]
    #[builder(default)]
    pub upstream_config: ReqwestConfig,

    /// How bearer credentials are verified.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "IDENTITY_MODE", value_enum, default_value_t = IdentityMode::Local)
    )]
    #[builder(default)]
    pub identity_mode: IdentityMode,

    /// Shared secret for HS256 tokens, required in local identity mode.
    #[cfg_attr(feature = "config", arg(long, env = "JWT_SECRET", hide_env_values = true))]
    #[builder(default)]
    pub jwt_secret: Option<String>,
}

impl ServiceConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Validates values that command-line parsing cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        check_identity(self.identity_mode, self.jwt_secret.as_deref()).map_err(Error::config)?;
        self.postgres_config
            .validate()
            .map_err(|e| Error::config("Invalid database configuration").with_source(e))
    }

    /// Connects to Postgres database and runs migrations.
    pub async fn connect_postgres(&self) -> Result<PgClient> {
        let pg_client = self.postgres_config.clone().build().map_err(|e| {
            Error::unavailable("postgres", "Failed to create database client").with_source(e)
        })?;

        let migrations = pg_client.run_pending_migrations().await.map_err(|e| {
            Error::internal("postgres", "Failed to apply database migrations").with_source(e)
        })?;

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            applied = migrations.applied_versions.len(),
            duration_ms = migrations.duration.as_millis(),
            "Database is ready"
        );

        Ok(pg_client)
    }

    /// Creates the HTTP client for the post and user services.
    pub fn create_upstream(&self) -> Result<ReqwestClient> {
        ReqwestClient::new(self.upstream_config.clone()).map_err(|e| {
            Error::config("Invalid post or user service configuration").with_source(e)
        })
    }

    /// Creates the identity verifier selected by [`IdentityMode`].
    pub fn create_identity_verifier(&self, upstream: &ReqwestClient) -> Result<IdentityVerifier> {
        let verifier = match self.identity_mode {
            IdentityMode::Local => {
                let secret = self
                    .jwt_secret
                    .as_deref()
                    .filter(|secret| !secret.is_empty())
                    .ok_or_else(|| Error::config("JWT secret is required in local identity mode"))?;
                IdentityVerifier::local(secret)
            }
            IdentityMode::Remote => IdentityVerifier::remote(upstream.clone().into_user_service()),
        };

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            identity_mode = %self.identity_mode,
            "Identity verifier created"
        );

        Ok(verifier)
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("postgres_config", &self.postgres_config)
            .field("upstream_config", &self.upstream_config)
            .field("identity_mode", &self.identity_mode)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ServiceConfigBuilder {
    /// Wrapper for builder validation that returns String errors.
    fn validate(builder: &ServiceConfigBuilder) -> Result<(), String> {
        let mode = builder.identity_mode.unwrap_or_default();
        let secret = builder.jwt_secret.as_ref().and_then(|s| s.as_deref());
        check_identity(mode, secret)?;

        if let Some(postgres_config) = &builder.postgres_config {
            postgres_config.validate().map_err(|e| e.to_string())?;
        }

        Ok(())
    }
}

fn check_identity(mode: IdentityMode, jwt_secret: Option<&str>) -> Result<(), String> {
    if mode == IdentityMode::Local && jwt_secret.is_none_or(str::is_empty) {
        return Err("JWT secret is required in local identity mode".to_string());
    }
    Ok(())
}
