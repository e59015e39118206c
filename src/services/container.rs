//! Service container - centralized service wiring.
//!
//! Builds the auth stack once from a pair of store implementations and
//! hands out shared handles; hosts keep one container in their state.

use std::sync::Arc;

use super::{AuthService, Authenticator, TokenService, UserManager, UserService};
use crate::access::AccessControl;
use crate::config::AuthConfig;
use crate::infra::{InMemoryRoleRepository, InMemoryUserRepository, RoleRepository, UserRepository};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user management service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get access control layer
    fn access(&self) -> Arc<AccessControl>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    access_control: Arc<AccessControl>,
}

impl Services {
    /// Wire the full auth stack over the given store implementations.
    pub fn from_stores(
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        config: AuthConfig,
    ) -> Self {
        let tokens = TokenService::new(config.clone());
        let auth_service = Arc::new(Authenticator::new(users.clone(), roles.clone(), config));
        let user_service = Arc::new(UserManager::new(users.clone(), roles));
        let access_control = Arc::new(AccessControl::new(tokens, users));

        Self {
            auth_service,
            user_service,
            access_control,
        }
    }

    /// Wire the stack over fresh in-memory stores (tests, ephemeral use).
    pub fn in_memory(config: AuthConfig) -> Self {
        Self::from_stores(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryRoleRepository::new()),
            config,
        )
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn access(&self) -> Arc<AccessControl> {
        self.access_control.clone()
    }
}
