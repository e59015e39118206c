//! Crate-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Tokens & Security
// =============================================================================

/// Default access token lifetime in seconds (24 hours)
pub const DEFAULT_ACCESS_TOKEN_LIFETIME_SECS: i64 = 86_400;

/// Default refresh token lifetime in seconds (7 days)
pub const DEFAULT_REFRESH_TOKEN_LIFETIME_SECS: i64 = 604_800;

/// Minimum signing secret length in bytes (HS256 requires >= 256 bits)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// Token type identifier returned in auth responses
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

// =============================================================================
// Roles
// =============================================================================

/// Role assigned to new users when no other role is configured
pub const DEFAULT_ROLE_NAME: &str = "ROLE_USER";

/// Administrator role with elevated privileges
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// Maximum role name length
pub const MAX_ROLE_NAME_LENGTH: usize = 50;

/// Maximum role description length
pub const MAX_ROLE_DESCRIPTION_LENGTH: usize = 255;

// =============================================================================
// Audit & Lifecycle
// =============================================================================

/// Version assigned to an aggregate on its first write
pub const INITIAL_VERSION: i64 = 0;

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Minimum username length requirement
pub const MIN_USERNAME_LENGTH: u64 = 3;

/// Maximum username length requirement
pub const MAX_USERNAME_LENGTH: u64 = 50;

// =============================================================================
// Pagination
// =============================================================================

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Maximum allowed items per page to prevent excessive queries
pub const MAX_PAGE_SIZE: u64 = 100;

/// Default starting page number (1-indexed)
pub const DEFAULT_PAGE_NUMBER: u64 = 1;
