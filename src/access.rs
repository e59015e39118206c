//! Access control layer - policy evaluation at protected boundaries.
//!
//! Identification (bearer header, token validation, store lookup) fails
//! with `Unauthorized` before any policy runs; policy denial fails with
//! `Forbidden`. Policy evaluation itself is pure: no IO, no panics.

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::{AuthError, AuthResult};
use crate::infra::UserRepository;
use crate::services::{TokenKind, TokenService};

/// Contract for principal types: an identity accessor plus role
/// membership, resolved at compile time rather than by introspection.
pub trait Subject {
    fn subject_id(&self) -> Uuid;
    fn has_role(&self, role: &str) -> bool;
}

/// Authenticated caller with its current role set.
///
/// Roles are resolved from the store at evaluation time, not from token
/// claims, so role changes take effect without forcing re-login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub username: String,
    pub roles: HashSet<String>,
}

impl Subject for Principal {
    fn subject_id(&self) -> Uuid {
        self.id
    }

    fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// Declarative access requirement for a protected operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Policy {
    /// Caller must hold the named role
    RequireRole(String),
    /// Caller must hold at least one of the named roles
    RequireAnyRole(Vec<String>),
    /// Caller must be the target user or hold the named role
    RequireSelfOrRole { target: Uuid, role: String },
}

impl Policy {
    pub fn require_role(role: impl Into<String>) -> Self {
        Policy::RequireRole(role.into())
    }

    pub fn require_any_role<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Policy::RequireAnyRole(roles.into_iter().map(Into::into).collect())
    }

    pub fn require_self_or_role(target: Uuid, role: impl Into<String>) -> Self {
        Policy::RequireSelfOrRole {
            target,
            role: role.into(),
        }
    }

    /// Allow/deny decision for an already-authenticated subject.
    pub fn evaluate<S: Subject>(&self, subject: &S) -> AuthResult<()> {
        let allowed = match self {
            Policy::RequireRole(role) => subject.has_role(role),
            Policy::RequireAnyRole(roles) => roles.iter().any(|role| subject.has_role(role)),
            Policy::RequireSelfOrRole { target, role } => {
                subject.subject_id() == *target || subject.has_role(role)
            }
        };

        if allowed {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

/// Resolves callers from bearer credentials and enforces policies.
pub struct AccessControl {
    tokens: TokenService,
    users: Arc<dyn UserRepository>,
}

impl AccessControl {
    pub fn new(tokens: TokenService, users: Arc<dyn UserRepository>) -> Self {
        Self { tokens, users }
    }

    /// Extract the token from an Authorization header value.
    pub fn bearer_token(header: &str) -> Option<&str> {
        let token = header.strip_prefix(BEARER_TOKEN_PREFIX)?.trim();
        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    }

    /// Identify the caller behind an Authorization header value.
    ///
    /// Any failure along the way (missing scheme, bad signature, expiry,
    /// wrong token kind, unknown or gated-off user) collapses to
    /// `Unauthorized`.
    pub async fn authenticate(&self, authorization: &str) -> AuthResult<Principal> {
        let token = Self::bearer_token(authorization).ok_or(AuthError::Unauthorized)?;
        let claims = self
            .tokens
            .decode_kind(token, TokenKind::Access)
            .map_err(|_| AuthError::Unauthorized)?;

        let user = self
            .users
            .find_by_username(&claims.sub)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        if !user.can_authenticate() {
            return Err(AuthError::Unauthorized);
        }

        Ok(Principal {
            id: user.id,
            username: user.username.clone(),
            roles: user.role_names().into_iter().collect(),
        })
    }

    /// Identify the caller, then enforce the policy.
    pub async fn authorize(&self, authorization: &str, policy: &Policy) -> AuthResult<Principal> {
        let principal = self.authenticate(authorization).await?;
        policy.evaluate(&principal)?;
        Ok(principal)
    }
}
