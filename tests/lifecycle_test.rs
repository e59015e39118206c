//! End-to-end tests over the in-memory store: full auth scenarios,
//! audit/lifecycle invariants, and optimistic concurrency behavior.

use std::sync::Arc;

use uuid::Uuid;

use auth_kit::domain::{
    Actor, AssignRolesRequest, ChangePasswordRequest, LoginRequest, RefreshTokenRequest,
    RegisterRequest, Role, UpdateProfileRequest,
};
use auth_kit::errors::AuthError;
use auth_kit::infra::{
    InMemoryRoleRepository, InMemoryUserRepository, RoleRepository, UserRepository,
};
use auth_kit::services::{AuthService, ServiceContainer, UserService};
use auth_kit::types::PaginationParams;
use auth_kit::{AuthConfig, Policy, Services};

const TEST_SECRET: &str = "test-secret-key-for-testing-only-32chars";

struct Harness {
    users: Arc<InMemoryUserRepository>,
    roles: Arc<InMemoryRoleRepository>,
    services: Services,
}

fn harness() -> Harness {
    let users = Arc::new(InMemoryUserRepository::new());
    let roles = Arc::new(InMemoryRoleRepository::new());
    let services = Services::from_stores(
        users.clone(),
        roles.clone(),
        AuthConfig::new(TEST_SECRET).unwrap(),
    );
    Harness {
        users,
        roles,
        services,
    }
}

fn register_request(username: &str, email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        first_name: None,
        last_name: None,
        phone_number: None,
    }
}

fn login_request(username_or_email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        username_or_email: username_or_email.to_string(),
        password: password.to_string(),
    }
}

// =============================================================================
// Register / login scenario
// =============================================================================

#[tokio::test]
async fn register_then_login_full_scenario() {
    let h = harness();
    let auth = h.services.auth();

    // register alice -> access token with roles=["ROLE_USER"]
    let registered = auth
        .register(register_request("alice", "alice@x.com", "pw123456"))
        .await
        .unwrap();
    assert_eq!(registered.user.roles, vec!["ROLE_USER"]);

    // a second registration with the same username conflicts,
    // whatever the email
    let result = auth
        .register(register_request("alice", "other@x.com", "pw234567"))
        .await;
    assert!(matches!(result, Err(AuthError::Conflict(_))));

    // wrong password is rejected
    let result = auth.login(login_request("alice@x.com", "wrongpw1")).await;
    assert!(matches!(result, Err(AuthError::Unauthorized)));

    // login by email with the right password returns the same role set
    let logged_in = auth
        .login(login_request("alice@x.com", "pw123456"))
        .await
        .unwrap();
    assert_eq!(logged_in.user.roles, registered.user.roles);

    // login by username works too
    assert!(auth.login(login_request("alice", "pw123456")).await.is_ok());

    // lookups by username resolve the same account
    let view = h
        .services
        .users()
        .get_user_by_username("alice")
        .await
        .unwrap();
    assert_eq!(view.email, "alice@x.com");

    // logout is advisory; the issued tokens stay usable until expiry
    auth.logout();
    assert!(auth.login(login_request("alice", "pw123456")).await.is_ok());
}

#[tokio::test]
async fn default_role_is_created_once_and_reused() {
    let h = harness();
    let auth = h.services.auth();

    auth.register(register_request("alice", "alice@x.com", "pw123456"))
        .await
        .unwrap();
    auth.register(register_request("bob", "bob@x.com", "pw123456"))
        .await
        .unwrap();

    let roles = h.roles.list().await.unwrap();
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].name, "ROLE_USER");
}

// =============================================================================
// Optimistic concurrency
// =============================================================================

#[tokio::test]
async fn concurrent_saves_from_the_same_version_let_exactly_one_win() {
    let h = harness();
    h.services
        .auth()
        .register(register_request("alice", "alice@x.com", "pw123456"))
        .await
        .unwrap();

    let alice = h.users.find_by_username("alice").await.unwrap().unwrap();

    // Two writers start from the same snapshot
    let mut first = alice.clone();
    first.first_name = Some("Alice".to_string());
    let mut second = alice;
    second.last_name = Some("Smith".to_string());

    let (first_result, second_result) =
        tokio::join!(h.users.save(first), h.users.save(second));

    let outcomes = [first_result.is_ok(), second_result.is_ok()];
    assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);

    let loser = if outcomes[0] {
        second_result.unwrap_err()
    } else {
        first_result.unwrap_err()
    };
    assert!(matches!(loser, AuthError::Conflict(_)));
}

#[tokio::test]
async fn every_service_mutation_bumps_the_version_by_one() {
    let h = harness();
    let users_service = h.services.users();
    h.services
        .auth()
        .register(register_request("alice", "alice@x.com", "pw123456"))
        .await
        .unwrap();

    let alice = h.users.find_by_username("alice").await.unwrap().unwrap();
    assert_eq!(alice.audit.version, 0);

    let actor = Actor::User(alice.id);
    users_service
        .update_profile(
            alice.id,
            UpdateProfileRequest {
                first_name: Some("Alice".to_string()),
                ..Default::default()
            },
            &actor,
        )
        .await
        .unwrap();
    users_service
        .update_profile(
            alice.id,
            UpdateProfileRequest {
                last_name: Some("Smith".to_string()),
                ..Default::default()
            },
            &actor,
        )
        .await
        .unwrap();

    let alice = h.users.find_by_id(alice.id).await.unwrap().unwrap();
    assert_eq!(alice.audit.version, 2);
    assert_eq!(alice.audit.updated_by, Some(alice.id));
    assert_eq!(alice.audit.created_by, None);
    assert_eq!(alice.first_name.as_deref(), Some("Alice"));
    assert_eq!(alice.last_name.as_deref(), Some("Smith"));
}

// =============================================================================
// Soft delete / restore
// =============================================================================

#[tokio::test]
async fn soft_delete_then_restore_preserves_the_creation_trail() {
    let h = harness();
    let users_service = h.services.users();
    h.services
        .auth()
        .register(register_request("alice", "alice@x.com", "pw123456"))
        .await
        .unwrap();

    let before = h.users.find_by_username("alice").await.unwrap().unwrap();
    let admin = Actor::User(Uuid::new_v4());

    users_service.soft_delete(before.id, &admin).await.unwrap();

    let deleted = h.users.find_by_id(before.id).await.unwrap().unwrap();
    assert!(deleted.is_deleted());
    assert!(deleted.lifecycle.deleted_at.is_some());
    assert_eq!(deleted.lifecycle.deleted_by, admin.id());

    // Deleted users disappear from listings but stay resolvable by key,
    // and cannot log in
    let page = users_service
        .list_users(PaginationParams::default())
        .await
        .unwrap();
    assert_eq!(page.meta.total, 0);
    let result = h
        .services
        .auth()
        .login(login_request("alice", "pw123456"))
        .await;
    assert!(matches!(result, Err(AuthError::Unauthorized)));

    users_service.restore(before.id, &admin).await.unwrap();

    let restored = h.users.find_by_id(before.id).await.unwrap().unwrap();
    assert!(!restored.is_deleted());
    assert!(restored.lifecycle.deleted_at.is_none());
    assert!(restored.lifecycle.deleted_by.is_none());
    // Creation stamps survived the whole round trip
    assert_eq!(restored.audit.created_at, before.audit.created_at);
    assert_eq!(restored.audit.created_by, before.audit.created_by);

    // And the account works again
    assert!(h
        .services
        .auth()
        .login(login_request("alice", "pw123456"))
        .await
        .is_ok());
}

#[tokio::test]
async fn restore_of_a_live_user_is_a_business_rule_violation() {
    let h = harness();
    h.services
        .auth()
        .register(register_request("alice", "alice@x.com", "pw123456"))
        .await
        .unwrap();
    let alice = h.users.find_by_username("alice").await.unwrap().unwrap();

    let result = h
        .services
        .users()
        .restore(alice.id, &Actor::System)
        .await;
    assert!(matches!(result, Err(AuthError::BusinessRule(_))));
}

#[tokio::test]
async fn lifecycle_operations_on_unknown_users_are_not_found() {
    let h = harness();
    let users_service = h.services.users();
    let missing = Uuid::new_v4();

    assert!(matches!(
        users_service.soft_delete(missing, &Actor::System).await,
        Err(AuthError::NotFound)
    ));
    assert!(matches!(
        users_service.restore(missing, &Actor::System).await,
        Err(AuthError::NotFound)
    ));
    assert!(matches!(
        users_service.get_user(missing).await,
        Err(AuthError::NotFound)
    ));
}

// =============================================================================
// Password change
// =============================================================================

#[tokio::test]
async fn change_password_verifies_the_old_one() {
    let h = harness();
    let auth = h.services.auth();
    let users_service = h.services.users();

    auth.register(register_request("alice", "alice@x.com", "pw123456"))
        .await
        .unwrap();
    let alice = h.users.find_by_username("alice").await.unwrap().unwrap();
    let actor = Actor::User(alice.id);

    let result = users_service
        .change_password(
            alice.id,
            ChangePasswordRequest {
                old_password: "wrongpw1".to_string(),
                new_password: "newpw12345".to_string(),
            },
            &actor,
        )
        .await;
    assert!(matches!(result, Err(AuthError::BusinessRule(_))));

    users_service
        .change_password(
            alice.id,
            ChangePasswordRequest {
                old_password: "pw123456".to_string(),
                new_password: "newpw12345".to_string(),
            },
            &actor,
        )
        .await
        .unwrap();

    // Old credential stops working, the new one logs in
    assert!(matches!(
        auth.login(login_request("alice", "pw123456")).await,
        Err(AuthError::Unauthorized)
    ));
    assert!(auth
        .login(login_request("alice", "newpw12345"))
        .await
        .is_ok());
}

// =============================================================================
// Role assignment & access control
// =============================================================================

#[tokio::test]
async fn assign_roles_replaces_the_set_and_requires_known_roles() {
    let h = harness();
    let auth = h.services.auth();
    let users_service = h.services.users();

    auth.register(register_request("alice", "alice@x.com", "pw123456"))
        .await
        .unwrap();
    let alice = h.users.find_by_username("alice").await.unwrap().unwrap();

    // Unknown role name
    let result = users_service
        .assign_roles(
            alice.id,
            AssignRolesRequest {
                roles: vec!["ROLE_AUDITOR".to_string()],
            },
            &Actor::System,
        )
        .await;
    assert!(matches!(result, Err(AuthError::NotFound)));

    h.roles
        .save(Role::new("ROLE_ADMIN", Some("Administrator".to_string()), &Actor::System).unwrap())
        .await
        .unwrap();

    let view = users_service
        .assign_roles(
            alice.id,
            AssignRolesRequest {
                roles: vec!["ROLE_ADMIN".to_string()],
            },
            &Actor::System,
        )
        .await
        .unwrap();
    assert_eq!(view.roles, vec!["ROLE_ADMIN"]);

    assert_eq!(
        users_service.list_roles().await.unwrap(),
        vec!["ROLE_ADMIN", "ROLE_USER"]
    );
}

#[tokio::test]
async fn access_control_end_to_end() {
    let h = harness();
    let auth = h.services.auth();
    let access = h.services.access();

    let response = auth
        .register(register_request("alice", "alice@x.com", "pw123456"))
        .await
        .unwrap();
    let header = format!("Bearer {}", response.access_token);

    // Held role passes, missing role is Forbidden
    let principal = access
        .authorize(&header, &Policy::require_role("ROLE_USER"))
        .await
        .unwrap();
    assert_eq!(principal.username, "alice");
    assert!(matches!(
        access
            .authorize(&header, &Policy::require_role("ROLE_ADMIN"))
            .await,
        Err(AuthError::Forbidden)
    ));

    // Ownership satisfies self-or-role without the role
    let policy = Policy::require_self_or_role(principal.id, "ROLE_ADMIN");
    assert!(access.authorize(&header, &policy).await.is_ok());
    let policy = Policy::require_self_or_role(Uuid::new_v4(), "ROLE_ADMIN");
    assert!(matches!(
        access.authorize(&header, &policy).await,
        Err(AuthError::Forbidden)
    ));

    // Identification failures are Unauthorized before any policy runs
    let any = Policy::require_role("ROLE_USER");
    assert!(matches!(
        access.authorize("garbage", &any).await,
        Err(AuthError::Unauthorized)
    ));
    assert!(matches!(
        access.authorize("Bearer not.a.token", &any).await,
        Err(AuthError::Unauthorized)
    ));
    // A refresh token is not a bearer credential for protected calls
    let refresh_header = format!("Bearer {}", response.refresh_token);
    assert!(matches!(
        access.authorize(&refresh_header, &any).await,
        Err(AuthError::Unauthorized)
    ));
}

#[tokio::test]
async fn role_changes_take_effect_without_re_login() {
    let h = harness();
    let auth = h.services.auth();
    let access = h.services.access();

    let response = auth
        .register(register_request("alice", "alice@x.com", "pw123456"))
        .await
        .unwrap();
    let header = format!("Bearer {}", response.access_token);
    let alice = h.users.find_by_username("alice").await.unwrap().unwrap();

    let admin_policy = Policy::require_role("ROLE_ADMIN");
    assert!(access.authorize(&header, &admin_policy).await.is_err());

    h.roles
        .save(Role::new("ROLE_ADMIN", None, &Actor::System).unwrap())
        .await
        .unwrap();
    h.services
        .users()
        .assign_roles(
            alice.id,
            AssignRolesRequest {
                roles: vec!["ROLE_ADMIN".to_string(), "ROLE_USER".to_string()],
            },
            &Actor::System,
        )
        .await
        .unwrap();

    // Same token, fresh role set from the store
    assert!(access.authorize(&header, &admin_policy).await.is_ok());
}

// =============================================================================
// Refresh rotation
// =============================================================================

#[tokio::test]
async fn refresh_rotation_round_trip() {
    let h = harness();
    let auth = h.services.auth();

    let login = {
        auth.register(register_request("alice", "alice@x.com", "pw123456"))
            .await
            .unwrap();
        auth.login(login_request("alice", "pw123456")).await.unwrap()
    };

    let rotated = auth
        .refresh(RefreshTokenRequest {
            refresh_token: login.refresh_token,
        })
        .await
        .unwrap();
    assert_eq!(rotated.user.username, "alice");

    // The rotated pair keeps working
    let again = auth
        .refresh(RefreshTokenRequest {
            refresh_token: rotated.refresh_token,
        })
        .await
        .unwrap();
    assert_eq!(again.user.username, "alice");

    // An access token presented to refresh is rejected
    assert!(matches!(
        auth.refresh(RefreshTokenRequest {
            refresh_token: again.access_token,
        })
        .await,
        Err(AuthError::InvalidToken)
    ));
}
