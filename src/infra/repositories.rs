//! Credential store contracts.
//!
//! Host applications implement these traits over their own datastore;
//! the crate ships an in-memory implementation for tests and embedding.
//! Absence is always expressed as `None`, store failures as
//! `Unavailable`, and constraint violations as `Conflict`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Role, User};
use crate::errors::AuthResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User store contract.
///
/// Lookup semantics: `find_by_id` and the unique-field finders resolve
/// soft-deleted users too (identity stays reserved and queryable by
/// key); `list` returns only live users. Callers gate on lifecycle
/// state themselves.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>>;

    /// Resolve by username first, then by email.
    async fn find_by_username_or_email(&self, value: &str) -> AuthResult<Option<User>>;

    async fn exists_by_username(&self, username: &str) -> AuthResult<bool>;

    async fn exists_by_email(&self, email: &str) -> AuthResult<bool>;

    /// Live users only, with the total live count for pagination.
    async fn list(&self, offset: u64, limit: u64) -> AuthResult<(Vec<User>, u64)>;

    /// Insert-or-update with uniqueness and optimistic-version checks.
    ///
    /// The submitted aggregate carries the version it was read at. On
    /// update the store compares it against the stored version and
    /// rejects a mismatch with `Conflict`; on match it persists with
    /// version + 1 and returns the written aggregate. Inserts must carry
    /// the initial version. Username/email uniqueness violations also
    /// surface as `Conflict`, whether or not the caller pre-checked.
    async fn save(&self, user: User) -> AuthResult<User>;
}

/// Role store contract. Role names are unique store-wide.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<Role>>;

    async fn find_by_name(&self, name: &str) -> AuthResult<Option<Role>>;

    async fn list(&self) -> AuthResult<Vec<Role>>;

    /// Insert-or-update with the same version contract as user saves.
    /// A duplicate name surfaces as `Conflict`.
    async fn save(&self, role: Role) -> AuthResult<Role>;
}
