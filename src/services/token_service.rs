//! Token service - issuance and validation of signed bearer tokens.
//!
//! Tokens are self-contained: subject, role claims, lifetimes, and a
//! kind marker, signed with a symmetric key. No session store exists,
//! so issuance and validation are pure, lock-free computations; the
//! trade-off is that revocation is client-side only.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::AuthConfig;
use crate::errors::{AuthError, AuthResult};

/// Marker claim distinguishing access tokens from refresh tokens.
///
/// The refresh flow honors only `Refresh` tokens and protected calls
/// only `Access` tokens, so neither can stand in for the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Signed claim set carried by every token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject username
    pub sub: String,
    /// Role names; absent on refresh tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and validates signed tokens from immutable configuration.
#[derive(Clone)]
pub struct TokenService {
    config: AuthConfig,
}

impl TokenService {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Issue an access token carrying the subject's role names.
    pub fn issue_access_token(&self, username: &str, roles: Vec<String>) -> AuthResult<String> {
        let roles = if roles.is_empty() { None } else { Some(roles) };
        self.issue(
            username,
            roles,
            TokenKind::Access,
            self.config.access_token_lifetime_secs,
        )
    }

    /// Issue a refresh token; no role claims.
    pub fn issue_refresh_token(&self, username: &str) -> AuthResult<String> {
        self.issue(
            username,
            None,
            TokenKind::Refresh,
            self.config.refresh_token_lifetime_secs,
        )
    }

    fn issue(
        &self,
        username: &str,
        roles: Option<Vec<String>>,
        kind: TokenKind,
        lifetime_secs: i64,
    ) -> AuthResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            roles,
            kind,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(lifetime_secs)).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret_bytes()),
        )
        .map_err(|e| AuthError::internal(format!("Token encoding failed: {}", e)))
    }

    /// Check signature and expiry.
    ///
    /// Token content is untrusted input: this never errors or panics,
    /// whatever the input looks like. Failure causes are distinguished
    /// for logging only.
    pub fn validate(&self, token: &str) -> bool {
        match self.parse(token) {
            Ok(_) => true,
            Err(error) => {
                match error.kind() {
                    ErrorKind::ExpiredSignature => tracing::debug!("Expired token"),
                    ErrorKind::InvalidSignature => tracing::debug!("Invalid token signature"),
                    _ => tracing::debug!("Malformed token: {}", error),
                }
                false
            }
        }
    }

    /// Decode the claim set; fails with `InvalidToken` exactly when
    /// `validate` would return false.
    pub fn decode(&self, token: &str) -> AuthResult<Claims> {
        self.parse(token).map_err(|_| AuthError::InvalidToken)
    }

    /// Decode and additionally require the expected token kind.
    pub fn decode_kind(&self, token: &str, kind: TokenKind) -> AuthResult<Claims> {
        let claims = self.decode(token)?;
        if claims.kind != kind {
            tracing::debug!("Token kind mismatch: expected {:?}", kind);
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }

    /// Subject username of a valid token.
    pub fn subject_of(&self, token: &str) -> AuthResult<String> {
        Ok(self.decode(token)?.sub)
    }

    /// Access token lifetime in seconds, for auth responses.
    pub fn expires_in(&self) -> i64 {
        self.config.access_token_lifetime_secs
    }

    fn parse(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
    }
}
