use crate::application_port::{
    AccessToken, AuthError, RefreshToken, SessionService, SessionTokens, TokenCodec,
};
use crate::domain_model::{TokenKind, User, UserId};
use crate::domain_port::RefreshTokenStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

pub struct RealSessionService {
    token_codec: Arc<dyn TokenCodec>,
    refresh_store: Arc<dyn RefreshTokenStore>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl RealSessionService {
    pub fn new(
        token_codec: Arc<dyn TokenCodec>,
        refresh_store: Arc<dyn RefreshTokenStore>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            token_codec,
            refresh_store,
            access_ttl,
            refresh_ttl,
        }
    }

    #[inline]
    fn new_jti() -> String {
        Uuid::new_v4().to_string()
    }

    /// Mints a fresh pair and records the refresh jti. Shared by login
    /// issuance and rotation.
    async fn mint(&self, user_id: UserId, email: &str) -> Result<SessionTokens, AuthError> {
        let access_jti = Self::new_jti();
        let refresh_jti = Self::new_jti();

        let (access_token, access_exp) = self
            .token_codec
            .issue(user_id, email, TokenKind::Access, &access_jti, self.access_ttl)
            .await?;
        let (refresh_token, refresh_exp) = self
            .token_codec
            .issue(
                user_id,
                email,
                TokenKind::Refresh,
                &refresh_jti,
                self.refresh_ttl,
            )
            .await?;

        self.refresh_store
            .put(&refresh_jti, user_id, self.refresh_ttl.as_secs())
            .await?;

        Ok(SessionTokens {
            access_token: AccessToken(access_token),
            refresh_token: RefreshToken(refresh_token),
            access_expires_at: access_exp,
            refresh_expires_at: refresh_exp,
        })
    }
}

#[async_trait::async_trait]
impl SessionService for RealSessionService {
    async fn issue(&self, user: &User) -> Result<SessionTokens, AuthError> {
        self.mint(user.user_id, &user.email).await
    }

    async fn rotate(&self, refresh_token: &str) -> Result<SessionTokens, AuthError> {
        // Any cryptographic failure collapses to Unauthorized; no detail
        // leaks to the caller.
        let claims = self
            .token_codec
            .verify(refresh_token)
            .await
            .map_err(|_| AuthError::Unauthorized)?;

        if claims.kind != TokenKind::Refresh {
            return Err(AuthError::Unauthorized);
        }

        // The store entry, not the signature, decides liveness.
        let stored_user = match self.refresh_store.get(&claims.jti).await? {
            Some(user_id) => user_id,
            None => {
                debug!(jti = %claims.jti, "refresh token revoked or unknown");
                return Err(AuthError::Unauthorized);
            }
        };

        if stored_user != claims.user_id {
            // A signed token pointing at someone else's entry. Kill the
            // entry before refusing.
            warn!(jti = %claims.jti, "refresh token subject mismatch, revoking entry");
            self.refresh_store.delete(&claims.jti).await?;
            return Err(AuthError::Unauthorized);
        }

        // Single use: consume before reissuing. Concurrent rotations of the
        // same token race on this delete and exactly one wins. If the put
        // inside mint() fails after this point the lineage ends here and the
        // user has to log in again; the old entry is never left usable.
        if !self.refresh_store.delete(&claims.jti).await? {
            return Err(AuthError::Unauthorized);
        }

        self.mint(claims.user_id, &claims.email).await
    }

    async fn revoke(&self, refresh_token: Option<&str>) -> Result<(), AuthError> {
        let Some(token) = refresh_token.filter(|t| !t.trim().is_empty()) else {
            return Ok(());
        };

        match self.token_codec.verify(token).await {
            Ok(claims) => {
                if let Err(e) = self.refresh_store.delete(&claims.jti).await {
                    warn!(jti = %claims.jti, "logout could not drop refresh entry: {}", e);
                }
            }
            Err(e) => {
                // Already unusable; nothing to revoke.
                debug!("logout with unusable refresh token: {}", e);
            }
        }
        Ok(())
    }

    fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }
}
