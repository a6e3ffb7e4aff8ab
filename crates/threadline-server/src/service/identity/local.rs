//! HS256 token verification with a shared secret.

use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use super::{Identity, IdentityProvider, Role};
use crate::utility::tracing_targets::TRACING_TARGET_AUTHENTICATION;
use crate::{Error, Result};

/// Claims carried by a locally verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// User identifier.
    pub id: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Role name; anything but `admin` is a regular user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Expiration time as seconds since the Unix epoch.
    pub exp: i64,
}

impl IdentityClaims {
    /// Creates claims for `id` expiring `ttl_secs` from now.
    pub fn new(id: impl Into<String>, ttl_secs: i64) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
            role: None,
            avatar: None,
            exp: jiff::Timestamp::now().as_second().saturating_add(ttl_secs),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the role name.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Signs the claims with `secret`.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn sign(&self, secret: impl AsRef<[u8]>) -> Result<String> {
        use jsonwebtoken::{EncodingKey, Header, encode};

        let key = EncodingKey::from_secret(secret.as_ref());
        encode(&Header::new(Algorithm::HS256), self, &key)
            .map_err(|e| Error::internal("identity", "Failed to sign token").with_source(e))
    }
}

impl From<IdentityClaims> for Identity {
    fn from(claims: IdentityClaims) -> Self {
        Self {
            role: Role::from_claim(claims.role.as_deref()),
            id: claims.id,
            name: claims.name,
            email: claims.email,
            avatar: claims.avatar,
        }
    }
}

/// [`IdentityProvider`] verifying HS256 tokens signed with a shared secret.
pub struct LocalIdentity {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl LocalIdentity {
    /// Creates a provider for tokens signed with `secret`.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            validation,
        }
    }
}

impl fmt::Debug for LocalIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalIdentity").finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl IdentityProvider for LocalIdentity {
    async fn verify(&self, bearer: &str) -> Result<Identity> {
        let token = decode::<IdentityClaims>(bearer, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    error = %e,
                    "Token validation failed"
                );
                Error::unauthorized("Invalid or expired token").with_source(e)
            })?;

        if token.claims.id.trim().is_empty() {
            return Err(Error::unauthorized("Invalid or expired token"));
        }

        Ok(token.claims.into())
    }
}
