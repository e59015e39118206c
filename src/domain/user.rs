//! User aggregate root and related types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::audit::{Actor, AuditStamps, Audited, SoftDelete};
use crate::domain::role::Role;
use crate::types::validation::validate_phone;

/// Account status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Active,
    Inactive,
    Pending,
    Suspended,
    Deleted,
}

impl Status {
    pub fn is_active(&self) -> bool {
        matches!(self, Status::Active)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Status::Active => "Active",
            Status::Inactive => "Inactive",
            Status::Pending => "Pending",
            Status::Suspended => "Suspended",
            Status::Deleted => "Deleted",
        };
        write!(f, "{}", name)
    }
}

/// User aggregate root.
///
/// `username` is immutable once set (the store rejects changes) and
/// `password_hash` never leaves the crate in serialized form. Role
/// membership is mutated only through the assign-roles operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub status: Status,
    pub enabled: bool,
    pub account_non_expired: bool,
    pub account_non_locked: bool,
    pub credentials_non_expired: bool,
    pub roles: Vec<Role>,
    pub lifecycle: SoftDelete,
    pub audit: AuditStamps,
}

impl User {
    /// Create an active user with every authentication gate open,
    /// stamped for its first write.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        actor: &Actor,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            first_name: None,
            last_name: None,
            phone_number: None,
            status: Status::Active,
            enabled: true,
            account_non_expired: true,
            account_non_locked: true,
            credentials_non_expired: true,
            roles: Vec::new(),
            lifecycle: SoftDelete::active(),
            audit: AuditStamps::on_create(actor),
        }
    }

    /// True when every authentication gate is open and the user is not
    /// soft-deleted. Login and token-based access both require this.
    pub fn can_authenticate(&self) -> bool {
        self.enabled
            && self.account_non_expired
            && self.account_non_locked
            && self.credentials_non_expired
            && !self.lifecycle.is_deleted()
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|role| role.name == name)
    }

    /// Role names, sorted for deterministic claim ordering.
    pub fn role_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.roles.iter().map(|role| role.name.clone()).collect();
        names.sort();
        names
    }

    /// Add a role, ignoring duplicates by name.
    pub fn add_role(&mut self, role: Role) {
        if !self.has_role(&role.name) {
            self.roles.push(role);
        }
    }

    /// Replace the whole role set.
    pub fn set_roles(&mut self, roles: Vec<Role>) {
        self.roles = roles;
    }

    pub fn is_deleted(&self) -> bool {
        self.lifecycle.is_deleted()
    }

    /// Mark this user soft-deleted.
    pub fn soft_delete(&mut self, actor: &Actor) {
        self.lifecycle.mark(actor);
    }

    /// Restore a soft-deleted user.
    pub fn restore(&mut self) {
        self.lifecycle.revert();
    }
}

impl Audited for User {
    fn audit(&self) -> &AuditStamps {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditStamps {
        &mut self.audit
    }
}

// =============================================================================
// Request / response DTOs
// =============================================================================

/// Registration request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Unique login name
    #[schema(example = "alice")]
    #[validate(length(min = 3, max = 50, message = "Username must be 3 to 50 characters"))]
    pub username: String,
    /// Unique email address
    #[schema(example = "alice@example.com")]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    /// Plaintext password (minimum 8 characters)
    #[schema(example = "SecurePass123!", min_length = 8)]
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[schema(example = "Alice")]
    pub first_name: Option<String>,
    #[schema(example = "Smith")]
    pub last_name: Option<String>,
    #[schema(example = "+1 555 0100")]
    #[validate(custom(function = validate_phone))]
    pub phone_number: Option<String>,
}

/// Login request; accepts either the username or the email
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "alice")]
    #[validate(length(min = 1, message = "Username or email is required"))]
    pub username_or_email: String,
    #[schema(example = "SecurePass123!")]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Refresh token request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Password change request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Old password is required"))]
    pub old_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Role assignment request; replaces the user's whole role set
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AssignRolesRequest {
    #[schema(example = json!(["ROLE_USER", "ROLE_ADMIN"]))]
    pub roles: Vec<String>,
}

/// Partial profile update
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(custom(function = validate_phone))]
    pub phone_number: Option<String>,
    pub status: Option<Status>,
}

/// User view (safe to return to clients)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub status: Status,
    /// Role names held by the user
    #[schema(example = json!(["ROLE_USER"]))]
    pub roles: Vec<String>,
    /// Account creation timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone_number: user.phone_number.clone(),
            status: user.status,
            roles: user.role_names(),
            created_at: user.audit.created_at,
        }
    }
}
