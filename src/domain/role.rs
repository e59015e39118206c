//! Role entity for role-based access control (RBAC).

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{MAX_ROLE_DESCRIPTION_LENGTH, MAX_ROLE_NAME_LENGTH};
use crate::domain::audit::{Actor, AuditStamps, Audited};
use crate::errors::{AuthError, AuthResult};

/// A named grant of privileges, referenced by users.
///
/// Names are unique store-wide ("ROLE_USER", "ROLE_ADMIN"). The set of
/// users holding a role is derived by querying users, not stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub audit: AuditStamps,
}

impl Role {
    /// Create a role, stamped for its first write.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        actor: &Actor,
    ) -> AuthResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AuthError::validation("Role name is required"));
        }
        if name.len() > MAX_ROLE_NAME_LENGTH {
            return Err(AuthError::validation(format!(
                "Role name must not exceed {} characters",
                MAX_ROLE_NAME_LENGTH
            )));
        }
        if let Some(ref description) = description {
            if description.len() > MAX_ROLE_DESCRIPTION_LENGTH {
                return Err(AuthError::validation(format!(
                    "Description must not exceed {} characters",
                    MAX_ROLE_DESCRIPTION_LENGTH
                )));
            }
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description,
            audit: AuditStamps::on_create(actor),
        })
    }
}

impl Audited for Role {
    fn audit(&self) -> &AuditStamps {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditStamps {
        &mut self.audit
    }
}
