//! Audit and lifecycle mixins shared by every persisted aggregate.
//!
//! Stamping is an explicit step invoked by the service-layer write path,
//! not an implicit persistence callback. The version increment belongs to
//! the store's compare-and-set write, so a stale writer always surfaces
//! as a `Conflict` instead of silently overwriting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::INITIAL_VERSION;

/// Identity of the caller performing a mutation.
///
/// `System` is the sentinel for unauthenticated flows (registration,
/// scheduled maintenance); everything else carries the caller's user ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    System,
    User(Uuid),
}

impl Actor {
    /// Audit field value for this actor. `System` stamps as absent.
    pub fn id(&self) -> Option<Uuid> {
        match self {
            Actor::System => None,
            Actor::User(id) => Some(*id),
        }
    }
}

/// Creation/update stamps plus the optimistic concurrency version.
///
/// Invariants:
/// - `created_at`/`created_by` are set exactly once, at creation.
/// - `updated_at`/`updated_by` change on every persisted mutation.
/// - `version` increases by exactly 1 per successful write; a write
///   carrying a stale version must be rejected by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuditStamps {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub version: i64,
}

impl AuditStamps {
    /// Stamps for a freshly created aggregate.
    pub fn on_create(actor: &Actor) -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            created_by: actor.id(),
            updated_by: actor.id(),
            version: INITIAL_VERSION,
        }
    }

    /// Refresh the update stamps before a write.
    ///
    /// The version is left untouched; the store increments it when the
    /// compare-and-set write succeeds.
    pub fn on_update(&mut self, actor: &Actor) {
        self.updated_at = Utc::now();
        self.updated_by = actor.id();
    }
}

/// Soft-delete state.
///
/// Invariant: either `deleted` is false, or `deleted` is true and
/// `deleted_at` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SoftDelete {
    pub deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<Uuid>,
}

impl SoftDelete {
    /// State of a live aggregate.
    pub fn active() -> Self {
        Self {
            deleted: false,
            deleted_at: None,
            deleted_by: None,
        }
    }

    /// Mark the aggregate deleted, recording when and by whom.
    pub fn mark(&mut self, actor: &Actor) {
        self.deleted = true;
        self.deleted_at = Some(Utc::now());
        self.deleted_by = actor.id();
    }

    /// Bring a soft-deleted aggregate back, clearing the deletion trail.
    pub fn revert(&mut self) {
        self.deleted = false;
        self.deleted_at = None;
        self.deleted_by = None;
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
}

impl Default for SoftDelete {
    fn default() -> Self {
        Self::active()
    }
}

/// Contract every audited aggregate implements so the write path can
/// stamp it uniformly.
pub trait Audited {
    fn audit(&self) -> &AuditStamps;
    fn audit_mut(&mut self) -> &mut AuditStamps;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_stamps_start_at_initial_version() {
        let actor = Actor::User(Uuid::new_v4());
        let stamps = AuditStamps::on_create(&actor);

        assert_eq!(stamps.version, INITIAL_VERSION);
        assert_eq!(stamps.created_at, stamps.updated_at);
        assert_eq!(stamps.created_by, actor.id());
        assert_eq!(stamps.updated_by, actor.id());
    }

    #[test]
    fn system_actor_stamps_as_absent() {
        let stamps = AuditStamps::on_create(&Actor::System);
        assert_eq!(stamps.created_by, None);
        assert_eq!(stamps.updated_by, None);
    }

    #[test]
    fn update_refreshes_stamps_but_not_version() {
        let mut stamps = AuditStamps::on_create(&Actor::System);
        let created_at = stamps.created_at;
        let editor = Actor::User(Uuid::new_v4());

        stamps.on_update(&editor);

        assert_eq!(stamps.created_at, created_at);
        assert_eq!(stamps.created_by, None);
        assert_eq!(stamps.updated_by, editor.id());
        assert_eq!(stamps.version, INITIAL_VERSION);
    }

    #[test]
    fn soft_delete_marks_and_reverts() {
        let actor = Actor::User(Uuid::new_v4());
        let mut lifecycle = SoftDelete::active();
        assert!(!lifecycle.is_deleted());

        lifecycle.mark(&actor);
        assert!(lifecycle.is_deleted());
        assert!(lifecycle.deleted_at.is_some());
        assert_eq!(lifecycle.deleted_by, actor.id());

        lifecycle.revert();
        assert!(!lifecycle.is_deleted());
        assert!(lifecycle.deleted_at.is_none());
        assert!(lifecycle.deleted_by.is_none());
    }
}
