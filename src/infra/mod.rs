//! Infrastructure layer - store contracts and reference implementations.
//!
//! The persistence engine itself is a host concern; this module defines
//! what the crate requires of it and ships an in-memory stand-in.

pub mod memory;
pub mod repositories;

pub use memory::{InMemoryRoleRepository, InMemoryUserRepository};
pub use repositories::{RoleRepository, UserRepository};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockRoleRepository, MockUserRepository};
