use crate::application_port::AuthError;
use crate::domain_model::UserId;

/// Server-side liveness authority for refresh tokens, keyed by jti.
///
/// Entry present: the refresh token is usable. Entry absent, whether deleted
/// or TTL-expired: the token is dead even if its signature still verifies.
/// Each operation is an atomic single-key call; only the rotation sequence
/// in the session service layers an ordering requirement on top.
#[async_trait::async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Upsert the jti with expiry `ttl_secs` from now.
    async fn put(&self, jti: &str, user_id: UserId, ttl_secs: u64) -> Result<(), AuthError>;

    /// Owning user for a live jti; `None` if absent or expired.
    async fn get(&self, jti: &str) -> Result<Option<UserId>, AuthError>;

    /// Remove the jti. No-op if absent; returns whether an entry was
    /// actually removed, so concurrent consumers can tell who won.
    async fn delete(&self, jti: &str) -> Result<bool, AuthError>;
}
