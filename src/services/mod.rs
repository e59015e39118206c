//! Service layer - authentication, token, and user management use cases.

pub mod auth_service;
pub mod container;
pub mod token_service;
pub mod user_service;

pub use auth_service::{AuthResponse, AuthService, Authenticator};
pub use container::{ServiceContainer, Services};
pub use token_service::{Claims, TokenKind, TokenService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
