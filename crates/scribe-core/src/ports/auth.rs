//! Identity provider ports: session tokens and password hashing.

use uuid::Uuid;

use crate::domain::Principal;

/// What a session token asserts about its bearer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub user_id: Uuid,
    pub username: String,
    pub is_staff: bool,
    pub exp: i64,
}

impl From<SessionClaims> for Principal {
    fn from(claims: SessionClaims) -> Self {
        Self {
            id: claims.user_id,
            username: claims.username,
            is_staff: claims.is_staff,
        }
    }
}

/// Issues and checks the token that backs a login session.
pub trait TokenService: Send + Sync {
    /// Issue a session token for an authenticated user.
    fn issue(&self, principal: &Principal) -> Result<String, AuthError>;

    /// Validate and decode a session token.
    fn validate(&self, token: &str) -> Result<SessionClaims, AuthError>;

    /// Lifetime of issued tokens.
    fn ttl_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password with a fresh salt.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;

    /// Do the work of one verification against a hash nobody owns.
    /// Used when the username is unknown, so the response time does not give it away.
    fn verify_decoy(&self, password: &str);
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Hashing error: {0}")]
    HashingError(String),
}
