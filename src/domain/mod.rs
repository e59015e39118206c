//! Domain layer - aggregates, value objects, and lifecycle mixins.

pub mod audit;
pub mod password;
pub mod role;
pub mod user;

pub use audit::{Actor, AuditStamps, Audited, SoftDelete};
pub use password::Password;
pub use role::Role;
pub use user::{
    AssignRolesRequest, ChangePasswordRequest, LoginRequest, RefreshTokenRequest, RegisterRequest,
    Status, UpdateProfileRequest, User, UserResponse,
};
