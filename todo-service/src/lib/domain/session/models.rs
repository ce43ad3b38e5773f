use std::fmt;
use std::str::FromStr;

use crate::domain::session::errors::AccessScopeError;
use crate::domain::user::models::User;

/// Class of action a session token authorizes.
///
/// Only `Auth` is issued today; the scope is still stored with every session
/// so a token can never be replayed under a different scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessScope {
    Auth,
}

impl AccessScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessScope::Auth => "auth",
        }
    }
}

impl FromStr for AccessScope {
    type Err = AccessScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auth" => Ok(AccessScope::Auth),
            other => Err(AccessScopeError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for AccessScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed session token string.
///
/// `Debug` never prints the token itself.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: String) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// One entry of a user's session set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access: AccessScope,
    pub token: SessionToken,
}

impl Session {
    pub fn new(access: AccessScope, token: SessionToken) -> Self {
        Self { access, token }
    }
}

/// Result of a successful token verification: the owning user as currently
/// stored, plus the exact session entry that matched.
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal {
    pub user: User,
    pub session: Session,
}
