use crate::domain_model::{TokenClaims, TokenKind, User, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("token expired")]
    TokenExpired,
    #[error("token signature invalid")]
    TokenInvalid,
    #[error("token malformed")]
    TokenMalformed,
    #[error("user not found")]
    UserNotFound,
    #[error("store error: {0}")]
    Store(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct AccessToken(pub String);

#[derive(Debug, Clone, Serialize)]
pub struct RefreshToken(pub String);

/// One freshly minted session: short-lived access token plus long-lived,
/// revocable refresh token, each with its own jti.
#[derive(Debug, Clone, Serialize)]
pub struct SessionTokens {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

/// Signs and verifies the wire form of a token. Owns cryptographic validity
/// only; refresh-token liveness belongs to the revocation store.
#[async_trait::async_trait]
pub trait TokenCodec: Send + Sync {
    async fn issue(
        &self,
        user_id: UserId,
        email: &str,
        kind: TokenKind,
        jti: &str,
        ttl: Duration,
    ) -> Result<(String, DateTime<Utc>), AuthError>;

    /// Checks signature and expiry and returns the decoded claims.
    /// Callers are responsible for checking `kind` against the position the
    /// token was presented in.
    async fn verify(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

#[async_trait::async_trait]
pub trait SessionService: Send + Sync {
    /// Mints a fresh access/refresh pair and records the refresh jti.
    async fn issue(&self, user: &User) -> Result<SessionTokens, AuthError>;

    /// Rotates a refresh token: single use, old jti dies, new pair returned.
    async fn rotate(&self, refresh_token: &str) -> Result<SessionTokens, AuthError>;

    /// Best-effort logout. Never fails on absent, malformed, or already
    /// unusable tokens.
    async fn revoke(&self, refresh_token: Option<&str>) -> Result<(), AuthError>;

    fn access_ttl(&self) -> Duration;
    fn refresh_ttl(&self) -> Duration;
}
