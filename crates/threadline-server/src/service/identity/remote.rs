//! Identity verification delegated to the user service.

use threadline_upstream::{UserProvider, UserService};

use super::{Identity, IdentityProvider};
use crate::utility::tracing_targets::TRACING_TARGET_AUTHENTICATION;
use crate::{Error, Result};

/// [`IdentityProvider`] forwarding the bearer credential to the user service.
#[derive(Debug, Clone)]
pub struct RemoteIdentity {
    users: UserService,
}

impl RemoteIdentity {
    /// Creates a provider backed by `users`.
    pub fn new(users: UserService) -> Self {
        Self { users }
    }
}

#[async_trait::async_trait]
impl IdentityProvider for RemoteIdentity {
    async fn verify(&self, bearer: &str) -> Result<Identity> {
        match self.users.current_user(bearer).await {
            Ok(user) => Ok(user.into()),
            Err(error) if error.is_unreachable() => {
                tracing::warn!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    error = %error,
                    "User service is unreachable"
                );
                Err(Error::unavailable("users", "User service is unreachable").with_source(error))
            }
            Err(error) => Err(Error::unauthorized("Invalid or expired token").with_source(error)),
        }
    }
}
