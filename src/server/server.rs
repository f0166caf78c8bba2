use crate::api::v1::CookieConfig;
use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra::*;
use crate::infra_redis::*;
use crate::logger::*;
use crate::settings::Settings;
use std::sync::Arc;
use std::time::Duration;

pub struct Server {
    pub session_service: Arc<dyn SessionService>,
    pub user_service: Arc<dyn UserService>,
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub token_codec: Arc<dyn TokenCodec>,
    pub cookies: CookieConfig,
    pub login_redirect: String,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let secret = std::env::var("JWT_SIGNING_KEY")
            .ok()
            .or_else(|| settings.auth.jwt_secret.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("auth.jwt_secret or JWT_SIGNING_KEY env var is required")
            })?;
        let token_codec: Arc<dyn TokenCodec> = Arc::new(JwtHs256Codec::from_secret(
            settings.auth.issuer.clone(),
            &secret,
        )?);

        let refresh_store: Arc<dyn RefreshTokenStore> = match settings.auth.store_backend.as_str() {
            "memory" => Arc::new(MemoryRefreshTokenStore::new()),
            "redis" => {
                let redis_client = redis::Client::open(settings.redis.url.as_str())?;
                let redis_manager = redis_client.get_connection_manager().await?;
                Arc::new(RedisRefreshTokenStore::new(
                    redis_manager,
                    settings.redis.key_prefix.clone(),
                ))
            }
            other => return Err(anyhow::anyhow!("Unknown store backend: {}", other)),
        };

        let session_service: Arc<dyn SessionService> = Arc::new(RealSessionService::new(
            token_codec.clone(),
            refresh_store,
            Duration::from_secs(settings.auth.access_ttl_secs),
            Duration::from_secs(settings.auth.refresh_ttl_secs),
        ));

        let user_repo: Arc<dyn UserRepo> = Arc::new(MemoryUserRepo::new());
        let user_service: Arc<dyn UserService> = Arc::new(RealUserService::new(user_repo));

        let identity_provider: Arc<dyn IdentityProvider> =
            match settings.auth.provider_backend.as_str() {
                "fake" => Arc::new(FakeIdentityProvider::new("/api/v1/auth/google/callback")),
                "google" => {
                    let google = settings.google.as_ref().ok_or_else(|| {
                        anyhow::anyhow!("[google] settings are required for the google provider")
                    })?;
                    Arc::new(GoogleIdentityProvider::new(GoogleConfig {
                        client_id: google.client_id.clone(),
                        client_secret: google.client_secret.clone(),
                        redirect_uri: google.redirect_uri.clone(),
                        auth_url: google.auth_url.clone(),
                        token_url: google.token_url.clone(),
                        userinfo_url: google.userinfo_url.clone(),
                    })?)
                }
                other => return Err(anyhow::anyhow!("Unknown provider backend: {}", other)),
            };

        info!(
            store = %settings.auth.store_backend,
            provider = %settings.auth.provider_backend,
            "server wired"
        );

        Ok(Self {
            session_service,
            user_service,
            identity_provider,
            token_codec,
            cookies: CookieConfig::from_settings(&settings.auth),
            login_redirect: settings.auth.login_redirect.clone(),
        })
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");
    }
}
