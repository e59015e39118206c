//! User service - account management business logic.
//!
//! Every mutation funnels through one stamped-write path so the audit
//! invariant (every write refreshes updated_at/updated_by and passes the
//! store's version check) holds by construction, not by convention.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Actor, AssignRolesRequest, Audited, ChangePasswordRequest, Password, Role,
    UpdateProfileRequest, User, UserResponse,
};
use crate::errors::{AuthError, AuthResult, OptionExt};
use crate::infra::{RoleRepository, UserRepository};
use crate::types::{Paginated, PaginationParams, validate_request};

/// User management service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID (soft-deleted users stay resolvable by key)
    async fn get_user(&self, id: Uuid) -> AuthResult<UserResponse>;

    /// Get user by username
    async fn get_user_by_username(&self, username: &str) -> AuthResult<UserResponse>;

    /// List live users with pagination
    async fn list_users(&self, params: PaginationParams) -> AuthResult<Paginated<UserResponse>>;

    /// Partial profile update
    async fn update_profile(
        &self,
        id: Uuid,
        request: UpdateProfileRequest,
        actor: &Actor,
    ) -> AuthResult<UserResponse>;

    /// Change password after verifying the old one
    async fn change_password(
        &self,
        id: Uuid,
        request: ChangePasswordRequest,
        actor: &Actor,
    ) -> AuthResult<()>;

    /// Replace the user's role set
    async fn assign_roles(
        &self,
        id: Uuid,
        request: AssignRolesRequest,
        actor: &Actor,
    ) -> AuthResult<UserResponse>;

    /// Soft delete (sets the deletion trail, keeps the record)
    async fn soft_delete(&self, id: Uuid, actor: &Actor) -> AuthResult<()>;

    /// Restore a soft-deleted user
    async fn restore(&self, id: Uuid, actor: &Actor) -> AuthResult<UserResponse>;

    /// All role names known to the store
    async fn list_roles(&self) -> AuthResult<Vec<String>>;
}

/// Concrete implementation of UserService over the store contracts.
pub struct UserManager {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
}

impl UserManager {
    pub fn new(users: Arc<dyn UserRepository>, roles: Arc<dyn RoleRepository>) -> Self {
        Self { users, roles }
    }

    async fn require_user(&self, id: Uuid) -> AuthResult<User> {
        self.users.find_by_id(id).await?.ok_or_not_found()
    }

    /// The single write path: stamp, then let the store run its
    /// compare-and-set version check.
    async fn persist(&self, mut user: User, actor: &Actor) -> AuthResult<User> {
        user.audit_mut().on_update(actor);
        self.users.save(user).await
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn get_user(&self, id: Uuid) -> AuthResult<UserResponse> {
        Ok(UserResponse::from(&self.require_user(id).await?))
    }

    async fn get_user_by_username(&self, username: &str) -> AuthResult<UserResponse> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_not_found()?;
        Ok(UserResponse::from(&user))
    }

    async fn list_users(&self, params: PaginationParams) -> AuthResult<Paginated<UserResponse>> {
        let (users, total) = self.users.list(params.offset(), params.limit()).await?;
        let views = users.iter().map(UserResponse::from).collect();
        Ok(Paginated::new(views, params.page, params.limit(), total))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        request: UpdateProfileRequest,
        actor: &Actor,
    ) -> AuthResult<UserResponse> {
        validate_request(&request)?;
        let mut user = self.require_user(id).await?;

        if let Some(first_name) = request.first_name {
            user.first_name = Some(first_name);
        }
        if let Some(last_name) = request.last_name {
            user.last_name = Some(last_name);
        }
        if let Some(phone_number) = request.phone_number {
            user.phone_number = Some(phone_number);
        }
        if let Some(status) = request.status {
            user.status = status;
        }

        let user = self.persist(user, actor).await?;
        tracing::info!("User updated successfully: {}", user.username);
        Ok(UserResponse::from(&user))
    }

    async fn change_password(
        &self,
        id: Uuid,
        request: ChangePasswordRequest,
        actor: &Actor,
    ) -> AuthResult<()> {
        validate_request(&request)?;
        let mut user = self.require_user(id).await?;

        if !Password::from_hash(user.password_hash.clone()).verify(&request.old_password) {
            return Err(AuthError::business_rule("Old password is incorrect"));
        }

        user.password_hash = Password::new(&request.new_password)?.into_string();
        let user = self.persist(user, actor).await?;
        tracing::info!("Password changed successfully for user: {}", user.username);
        Ok(())
    }

    async fn assign_roles(
        &self,
        id: Uuid,
        request: AssignRolesRequest,
        actor: &Actor,
    ) -> AuthResult<UserResponse> {
        let mut user = self.require_user(id).await?;

        let mut roles: Vec<Role> = Vec::with_capacity(request.roles.len());
        for name in &request.roles {
            let role = self.roles.find_by_name(name).await?.ok_or_not_found()?;
            roles.push(role);
        }
        user.set_roles(roles);

        let user = self.persist(user, actor).await?;
        tracing::info!(
            "Roles assigned to user {}: {:?}",
            user.username,
            user.role_names()
        );
        Ok(UserResponse::from(&user))
    }

    async fn soft_delete(&self, id: Uuid, actor: &Actor) -> AuthResult<()> {
        let mut user = self.require_user(id).await?;

        user.soft_delete(actor);
        let user = self.persist(user, actor).await?;
        tracing::info!("User soft deleted: {}", user.username);
        Ok(())
    }

    async fn restore(&self, id: Uuid, actor: &Actor) -> AuthResult<UserResponse> {
        let mut user = self.require_user(id).await?;
        if !user.is_deleted() {
            return Err(AuthError::business_rule("User is not deleted"));
        }

        user.restore();
        let user = self.persist(user, actor).await?;
        tracing::info!("User restored: {}", user.username);
        Ok(UserResponse::from(&user))
    }

    async fn list_roles(&self) -> AuthResult<Vec<String>> {
        let roles = self.roles.list().await?;
        Ok(roles.into_iter().map(|role| role.name).collect())
    }
}
