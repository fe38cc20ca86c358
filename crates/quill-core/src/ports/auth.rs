//! Authentication ports.

/// Claims carried by a bearer token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    /// Login username the token was issued for.
    pub username: String,
    /// Expiry as a unix timestamp.
    pub exp: i64,
}

/// Token service - issues and verifies signed bearer tokens.
///
/// Verification is stateless; a token stays valid until its expiry and
/// cannot be revoked earlier.
pub trait TokenService: Send + Sync {
    /// Issue a token bound to a login username.
    fn generate_token(&self, username: &str) -> Result<String, AuthError>;

    /// Verify signature and expiry, returning the decoded claims.
    ///
    /// Any failure means "not authenticated" - callers answer 401, never 500.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password with a fresh salt.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a stored hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
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

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Hashing error: {0}")]
    Hashing(String),
}
