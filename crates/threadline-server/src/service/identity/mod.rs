//! Caller identity verification.
//!
//! A bearer credential is turned into an [`Identity`] by an
//! [`IdentityProvider`]. Two providers exist and one is selected by
//! [`IdentityMode`]: [`LocalIdentity`] checks an HS256 token signed with a
//! shared secret, [`RemoteIdentity`] asks the user service.

mod local;
mod remote;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use threadline_postgres::model::Comment;
use threadline_upstream::{RemoteUser, UserService};

pub use self::local::{IdentityClaims, LocalIdentity};
pub use self::remote::RemoteIdentity;
use crate::Result;
use crate::utility::tracing_targets::TRACING_TARGET_AUTHENTICATION;

/// Role of an authenticated caller.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    /// Regular user, may only modify own comments.
    #[default]
    User,
    /// Administrator, may modify any comment.
    Admin,
}

impl Role {
    /// Parses a role claim, treating absent or unknown roles as [`Role::User`].
    pub fn from_claim(role: Option<&str>) -> Self {
        role.and_then(|role| role.parse().ok()).unwrap_or_default()
    }
}

/// Authenticated caller, trusted verbatim for authorship and authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// User identifier.
    pub id: String,
    /// Display name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Role of the caller.
    pub role: Role,
    /// Avatar URL.
    pub avatar: Option<String>,
}

impl Identity {
    /// Creates a user identity with no profile details.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
            role: Role::User,
            avatar: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Returns whether the caller is an administrator.
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Returns whether the caller may edit or delete `comment`.
    pub fn can_modify(&self, comment: &Comment) -> bool {
        self.is_admin() || comment.is_authored_by(&self.id)
    }
}

impl From<RemoteUser> for Identity {
    fn from(user: RemoteUser) -> Self {
        Self {
            role: Role::from_claim(user.role.as_deref()),
            id: user.id,
            name: user.name,
            email: user.email,
            avatar: user.avatar,
        }
    }
}

/// Which [`IdentityProvider`] verifies bearer credentials.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
#[cfg_attr(feature = "config", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IdentityMode {
    /// Verify HS256 tokens with a shared secret.
    #[default]
    Local,
    /// Delegate to the user service.
    Remote,
}

/// Turns a bearer credential into an [`Identity`].
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verifies `bearer` and returns the identity behind it.
    ///
    /// Fails with [`ErrorKind::Unauthorized`] when the credential is invalid
    /// or expired.
    ///
    /// [`ErrorKind::Unauthorized`]: crate::ErrorKind::Unauthorized
    async fn verify(&self, bearer: &str) -> Result<Identity>;
}

/// Shared handle to the configured [`IdentityProvider`].
#[derive(Clone)]
pub struct IdentityVerifier {
    inner: Arc<dyn IdentityProvider>,
}

impl IdentityVerifier {
    /// Wraps a provider into a shareable verifier.
    pub fn new(provider: impl IdentityProvider + 'static) -> Self {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Creates a verifier for HS256 tokens signed with `secret`.
    pub fn local(secret: impl AsRef<[u8]>) -> Self {
        Self::new(LocalIdentity::new(secret))
    }

    /// Creates a verifier delegating to the user service.
    pub fn remote(users: UserService) -> Self {
        Self::new(RemoteIdentity::new(users))
    }
}

impl fmt::Debug for IdentityVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityVerifier").finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl IdentityProvider for IdentityVerifier {
    async fn verify(&self, bearer: &str) -> Result<Identity> {
        let result = self.inner.verify(bearer).await;
        match &result {
            Ok(identity) => tracing::debug!(
                target: TRACING_TARGET_AUTHENTICATION,
                user_id = %identity.id,
                role = %identity.role,
                "Bearer credential verified"
            ),
            Err(error) => tracing::debug!(
                target: TRACING_TARGET_AUTHENTICATION,
                kind = %error.kind(),
                "Bearer credential rejected"
            ),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_roles_fall_back_to_user() {
        assert_eq!(Role::from_claim(Some("admin")), Role::Admin);
        assert_eq!(Role::from_claim(Some("user")), Role::User);
        assert_eq!(Role::from_claim(Some("moderator")), Role::User);
        assert_eq!(Role::from_claim(None), Role::User);
    }

    #[test]
    fn remote_users_become_identities() {
        let identity = Identity::from(RemoteUser {
            id: "u1".into(),
            name: Some("Ada".into()),
            email: None,
            role: Some("admin".into()),
            avatar: Some("https://cdn.example/ada.png".into()),
        });

        assert_eq!(identity.id, "u1");
        assert!(identity.is_admin());
        assert_eq!(identity.avatar.as_deref(), Some("https://cdn.example/ada.png"));
    }

    #[test]
    fn identity_mode_parses_snake_case() {
        assert_eq!("remote".parse::<IdentityMode>().ok(), Some(IdentityMode::Remote));
        assert_eq!(IdentityMode::default(), IdentityMode::Local);
    }
}
