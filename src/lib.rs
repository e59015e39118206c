//! auth-kit - reusable authentication and entity lifecycle building blocks
//!
//! This crate provides the auth core a backend application imports
//! rather than rewrites: JWT issuance and validation with refresh-token
//! rotation, credential verification, role-based access decisions, and
//! an audited, soft-deletable aggregate lifecycle with optimistic
//! concurrency.
//!
//! # Architecture Layers
//!
//! - **config**: immutable auth configuration and constants
//! - **domain**: aggregates, value objects, and lifecycle mixins
//! - **services**: authentication, token, and user management use cases
//! - **access**: policy evaluation at protected operation boundaries
//! - **infra**: store contracts and an in-memory reference store
//! - **types**: response envelopes, pagination, validation helpers
//! - **errors**: centralized error handling
//!
//! The persistence engine and the HTTP routing layer stay host concerns:
//! hosts implement [`infra::UserRepository`]/[`infra::RoleRepository`]
//! over their datastore and call the service traits from thin handlers.
//!
//! # Usage
//!
//! ```ignore
//! let config = AuthConfig::from_env();
//! let services = Services::from_stores(user_repo, role_repo, config);
//!
//! let response = services.auth().register(request).await?;
//! let principal = services
//!     .access()
//!     .authorize(auth_header, &Policy::require_role("ROLE_ADMIN"))
//!     .await?;
//! ```

pub mod access;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use access::{AccessControl, Policy, Principal, Subject};
pub use config::AuthConfig;
pub use domain::{Actor, Password, Role, Status, User, UserResponse};
pub use errors::{AuthError, AuthResult};
pub use services::{
    AuthResponse, AuthService, Authenticator, Claims, ServiceContainer, Services, TokenKind,
    TokenService, UserManager, UserService,
};
