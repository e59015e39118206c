//! Authentication service - registration, login, and token refresh.
//!
//! Coordinates the credential store, the password value object, and the
//! token service as one business transaction per operation. Holds no
//! state of its own beyond immutable configuration.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::{AuthConfig, TOKEN_TYPE_BEARER};
use crate::domain::{
    Actor, LoginRequest, Password, RefreshTokenRequest, RegisterRequest, Role, User, UserResponse,
};
use crate::errors::{AuthError, AuthResult};
use crate::infra::{RoleRepository, UserRepository};
use crate::services::token_service::{TokenKind, TokenService};
use crate::types::validate_request;

/// Authentication result returned by register, login, and refresh
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    /// Signed access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Signed refresh token
    pub refresh_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Access token lifetime in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user and issue its first token pair
    async fn register(&self, request: RegisterRequest) -> AuthResult<AuthResponse>;

    /// Verify credentials and issue a token pair
    async fn login(&self, request: LoginRequest) -> AuthResult<AuthResponse>;

    /// Rotate a refresh token into a fresh token pair
    async fn refresh(&self, request: RefreshTokenRequest) -> AuthResult<AuthResponse>;

    /// Advisory logout; outstanding tokens stay valid until expiry
    fn logout(&self);
}

/// Concrete implementation of AuthService over the store contracts.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    tokens: TokenService,
    default_role: String,
}

impl Authenticator {
    pub fn new(
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        config: AuthConfig,
    ) -> Self {
        Self {
            users,
            roles,
            default_role: config.default_role.clone(),
            tokens: TokenService::new(config),
        }
    }

    /// Resolve the configured default role, creating it on first use.
    ///
    /// Creation is idempotent under a concurrent first-registration
    /// race: the store's unique-name constraint is the final guard, and
    /// a duplicate-create conflict falls back to re-fetching the winner.
    async fn default_role(&self) -> AuthResult<Role> {
        if let Some(role) = self.roles.find_by_name(&self.default_role).await? {
            return Ok(role);
        }

        tracing::info!("Creating default role {}", self.default_role);
        let role = Role::new(
            self.default_role.clone(),
            Some("Default user role".to_string()),
            &Actor::System,
        )?;

        match self.roles.save(role).await {
            Ok(role) => Ok(role),
            Err(AuthError::Conflict(_)) => self
                .roles
                .find_by_name(&self.default_role)
                .await?
                .ok_or_else(|| {
                    AuthError::unavailable("default role missing after duplicate-create conflict")
                }),
            Err(error) => Err(error),
        }
    }

    /// Issue a token pair for the user and assemble the response.
    fn token_pair(&self, user: &User) -> AuthResult<AuthResponse> {
        let access_token = self
            .tokens
            .issue_access_token(&user.username, user.role_names())?;
        let refresh_token = self.tokens.issue_refresh_token(&user.username)?;

        Ok(AuthResponse {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.tokens.expires_in(),
            user: UserResponse::from(user),
        })
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, request: RegisterRequest) -> AuthResult<AuthResponse> {
        validate_request(&request)?;
        tracing::info!("Registering new user: {}", request.username);

        // Pre-checks are an optimization; the store's uniqueness
        // constraints still guard the concurrent-registration race at
        // save time and surface as the same Conflict.
        if self.users.exists_by_username(&request.username).await? {
            return Err(AuthError::conflict("Username is already taken"));
        }
        if self.users.exists_by_email(&request.email).await? {
            return Err(AuthError::conflict("Email is already in use"));
        }

        let digest = Password::new(&request.password)?;
        let default_role = self.default_role().await?;

        let mut user = User::new(
            request.username,
            request.email,
            digest.into_string(),
            &Actor::System,
        );
        user.first_name = request.first_name;
        user.last_name = request.last_name;
        user.phone_number = request.phone_number;
        user.add_role(default_role);

        let user = self.users.save(user).await?;
        tracing::info!("User registered successfully: {}", user.username);

        self.token_pair(&user)
    }

    async fn login(&self, request: LoginRequest) -> AuthResult<AuthResponse> {
        validate_request(&request)?;
        tracing::info!("User login attempt: {}", request.username_or_email);

        let user = self
            .users
            .find_by_username_or_email(&request.username_or_email)
            .await?;

        // SECURITY: verify against a dummy digest when the user is
        // absent so unknown-user and wrong-password take the same time
        // and return the same error (prevents user enumeration).
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";
        let (digest, user_exists) = match &user {
            Some(user) => (user.password_hash.as_str(), true),
            None => (dummy_hash, false),
        };
        let password_valid = Password::from_hash(digest.to_string()).verify(&request.password);

        if !user_exists || !password_valid {
            return Err(AuthError::Unauthorized);
        }
        let user = user.expect("user_exists was checked above");

        if !user.can_authenticate() {
            return Err(AuthError::Unauthorized);
        }

        tracing::info!("User logged in successfully: {}", user.username);
        // Login is read-only with respect to the user aggregate.
        self.token_pair(&user)
    }

    async fn refresh(&self, request: RefreshTokenRequest) -> AuthResult<AuthResponse> {
        let claims = self
            .tokens
            .decode_kind(&request.refresh_token, TokenKind::Refresh)?;

        let user = self
            .users
            .find_by_username(&claims.sub)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        if !user.can_authenticate() {
            return Err(AuthError::Unauthorized);
        }

        tracing::info!("Refreshing token pair for user: {}", user.username);
        // Rotation issues a fresh pair; the presented refresh token
        // stays valid until expiry since no revocation store exists.
        self.token_pair(&user)
    }

    fn logout(&self) {
        // Tokens are self-contained; invalidation is client-side.
        tracing::info!("User logged out");
    }
}
