//! Credential ports: access tokens and password hashes.

use uuid::Uuid;

/// What a verified access token says about its bearer.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub username: String,
    pub is_admin: bool,
    /// Unix seconds.
    pub exp: i64,
}

pub trait TokenService: Send + Sync {
    fn generate_token(
        &self,
        user_id: Uuid,
        username: &str,
        is_admin: bool,
    ) -> Result<String, AuthError>;

    /// Checks signature, issuer and expiry before returning the claims.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of issued tokens, reported to clients as `expiresIn`.
    fn expiration_seconds(&self) -> i64;
}

pub trait PasswordService: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// `Ok(false)` for a wrong password; `Err` only when `hash` is unreadable.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown email or wrong password; the two are never told apart.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("No bearer token supplied")]
    MissingAuth,

    #[error("Admin access required")]
    InsufficientPermissions,

    #[error("Password hashing failed: {0}")]
    HashingError(String),
}
