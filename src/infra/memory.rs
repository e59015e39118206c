//! In-memory credential store.
//!
//! Implements the full repository contracts, including the uniqueness
//! and optimistic-version behavior a relational store's constraints
//! would provide. Used by the crate's own tests; hosts can embed it for
//! theirs or for ephemeral deployments.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repositories::{RoleRepository, UserRepository};
use crate::config::INITIAL_VERSION;
use crate::domain::{Role, User};
use crate::errors::{AuthError, AuthResult};

/// In-memory user store keyed by ID.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn find_by_username_or_email(&self, value: &str) -> AuthResult<Option<User>> {
        let users = self.users.read().await;
        let found = users
            .values()
            .find(|user| user.username == value)
            .or_else(|| users.values().find(|user| user.email == value));
        Ok(found.cloned())
    }

    async fn exists_by_username(&self, username: &str) -> AuthResult<bool> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .any(|user| user.username == username))
    }

    async fn exists_by_email(&self, email: &str) -> AuthResult<bool> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .any(|user| user.email == email))
    }

    async fn list(&self, offset: u64, limit: u64) -> AuthResult<(Vec<User>, u64)> {
        let users = self.users.read().await;
        let mut live: Vec<User> = users
            .values()
            .filter(|user| !user.is_deleted())
            .cloned()
            .collect();
        live.sort_by(|a, b| a.audit.created_at.cmp(&b.audit.created_at));

        let total = live.len() as u64;
        let page = live
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn save(&self, user: User) -> AuthResult<User> {
        let mut users = self.users.write().await;

        match users.get(&user.id) {
            None => {
                // Insert path: uniqueness constraints are the final
                // guard, whether or not the caller pre-checked.
                if users.values().any(|existing| existing.username == user.username) {
                    return Err(AuthError::conflict("Username is already taken"));
                }
                if users.values().any(|existing| existing.email == user.email) {
                    return Err(AuthError::conflict("Email is already in use"));
                }
                if user.audit.version != INITIAL_VERSION {
                    return Err(AuthError::conflict(format!(
                        "Stale version {} for new user",
                        user.audit.version
                    )));
                }

                users.insert(user.id, user.clone());
                Ok(user)
            }
            Some(stored) => {
                if user.username != stored.username {
                    return Err(AuthError::business_rule("Username cannot be changed"));
                }
                if user.audit.version != stored.audit.version {
                    return Err(AuthError::conflict(format!(
                        "Stale version {} for user {} (stored {})",
                        user.audit.version, user.id, stored.audit.version
                    )));
                }
                if user.email != stored.email
                    && users
                        .values()
                        .any(|other| other.id != user.id && other.email == user.email)
                {
                    return Err(AuthError::conflict("Email is already in use"));
                }

                let mut written = user;
                written.audit.version += 1;
                users.insert(written.id, written.clone());
                Ok(written)
            }
        }
    }
}

/// In-memory role store keyed by ID, unique by name.
#[derive(Default)]
pub struct InMemoryRoleRepository {
    roles: RwLock<HashMap<Uuid, Role>>,
}

impl InMemoryRoleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<Role>> {
        Ok(self.roles.read().await.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AuthResult<Option<Role>> {
        Ok(self
            .roles
            .read()
            .await
            .values()
            .find(|role| role.name == name)
            .cloned())
    }

    async fn list(&self) -> AuthResult<Vec<Role>> {
        let mut roles: Vec<Role> = self.roles.read().await.values().cloned().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn save(&self, role: Role) -> AuthResult<Role> {
        let mut roles = self.roles.write().await;

        match roles.get(&role.id) {
            None => {
                if roles.values().any(|existing| existing.name == role.name) {
                    return Err(AuthError::conflict(format!(
                        "Role {} already exists",
                        role.name
                    )));
                }
                if role.audit.version != INITIAL_VERSION {
                    return Err(AuthError::conflict(format!(
                        "Stale version {} for new role",
                        role.audit.version
                    )));
                }

                roles.insert(role.id, role.clone());
                Ok(role)
            }
            Some(stored) => {
                if role.audit.version != stored.audit.version {
                    return Err(AuthError::conflict(format!(
                        "Stale version {} for role {} (stored {})",
                        role.audit.version, role.id, stored.audit.version
                    )));
                }
                if role.name != stored.name
                    && roles
                        .values()
                        .any(|other| other.id != role.id && other.name == role.name)
                {
                    return Err(AuthError::conflict(format!(
                        "Role {} already exists",
                        role.name
                    )));
                }

                let mut written = role;
                written.audit.version += 1;
                roles.insert(written.id, written.clone());
                Ok(written)
            }
        }
    }
}
