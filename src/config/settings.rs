//! Auth configuration, loaded from environment variables or built
//! programmatically by the host application.

use std::env;

use super::constants::{
    DEFAULT_ACCESS_TOKEN_LIFETIME_SECS, DEFAULT_REFRESH_TOKEN_LIFETIME_SECS, DEFAULT_ROLE_NAME,
    MIN_JWT_SECRET_LENGTH,
};
use crate::errors::{AuthError, AuthResult};

/// Immutable auth configuration.
///
/// Loaded once at startup; token issuance and validation read it
/// without locks. All shared mutable state lives behind the repository
/// contracts instead.
#[derive(Clone)]
pub struct AuthConfig {
    jwt_secret: String,
    pub access_token_lifetime_secs: i64,
    pub refresh_token_lifetime_secs: i64,
    pub default_role: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("access_token_lifetime_secs", &self.access_token_lifetime_secs)
            .field("refresh_token_lifetime_secs", &self.refresh_token_lifetime_secs)
            .field("default_role", &self.default_role)
            .finish()
    }
}

impl AuthConfig {
    /// Create a configuration with default lifetimes and role name.
    ///
    /// # Errors
    /// Returns a validation error if the secret is shorter than 256 bits.
    pub fn new(jwt_secret: impl Into<String>) -> AuthResult<Self> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AuthError::validation(format!(
                "Signing secret must be at least {} bytes",
                MIN_JWT_SECRET_LENGTH
            )));
        }

        Ok(Self {
            jwt_secret,
            access_token_lifetime_secs: DEFAULT_ACCESS_TOKEN_LIFETIME_SECS,
            refresh_token_lifetime_secs: DEFAULT_REFRESH_TOKEN_LIFETIME_SECS,
            default_role: DEFAULT_ROLE_NAME.to_string(),
        })
    }

    /// Override the access token lifetime.
    pub fn with_access_lifetime(mut self, secs: i64) -> Self {
        self.access_token_lifetime_secs = secs;
        self
    }

    /// Override the refresh token lifetime.
    pub fn with_refresh_lifetime(mut self, secs: i64) -> Self {
        self.refresh_token_lifetime_secs = secs;
        self
    }

    /// Override the role assigned on registration.
    pub fn with_default_role(mut self, role: impl Into<String>) -> Self {
        self.default_role = role.into();
        self
    }

    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short (security requirement).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                // Development mode: use default but warn
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                // Production mode: panic
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        let mut config =
            Self::new(jwt_secret).unwrap_or_else(|e| panic!("Invalid JWT_SECRET: {}", e));

        config.access_token_lifetime_secs = env::var("JWT_ACCESS_TOKEN_LIFETIME_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_ACCESS_TOKEN_LIFETIME_SECS);
        config.refresh_token_lifetime_secs = env::var("JWT_REFRESH_TOKEN_LIFETIME_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_REFRESH_TOKEN_LIFETIME_SECS);
        config.default_role =
            env::var("DEFAULT_ROLE_NAME").unwrap_or_else(|_| DEFAULT_ROLE_NAME.to_string());

        config
    }

    /// Get signing secret bytes for token issuance/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}
