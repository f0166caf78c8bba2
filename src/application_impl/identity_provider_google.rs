use crate::application_port::{ExternalIdentity, IdentityProvider, IdentityProviderError};
use serde::Deserialize;
use url::Url;

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
}

/// Code-for-identity exchange against Google's OAuth2/OIDC endpoints.
/// The identity document comes from the userinfo endpoint over TLS, so no
/// local id_token signature handling is needed.
pub struct GoogleIdentityProvider {
    http: reqwest::Client,
    auth_url: Url,
    cfg: GoogleConfig,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl GoogleIdentityProvider {
    pub fn new(cfg: GoogleConfig) -> anyhow::Result<Self> {
        let auth_url = Url::parse(&cfg.auth_url)?;
        Ok(GoogleIdentityProvider {
            http: reqwest::Client::new(),
            auth_url,
            cfg,
        })
    }
}

#[async_trait::async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    fn authorize_url(&self) -> String {
        let mut url = self.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("scope", "openid email profile")
            .append_pair("client_id", &self.cfg.client_id)
            .append_pair("redirect_uri", &self.cfg.redirect_uri);
        url.to_string()
    }

    async fn exchange_code(&self, code: &str) -> Result<ExternalIdentity, IdentityProviderError> {
        let response = self
            .http
            .post(&self.cfg.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", &self.cfg.client_id),
                ("client_secret", &self.cfg.client_secret),
                ("redirect_uri", &self.cfg.redirect_uri),
            ])
            .send()
            .await
            .map_err(|e| IdentityProviderError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(IdentityProviderError::Exchange(format!(
                "token endpoint returned {}",
                response.status()
            )));
        }
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| IdentityProviderError::Transport(e.to_string()))?;

        let response = self
            .http
            .get(&self.cfg.userinfo_url)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| IdentityProviderError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(IdentityProviderError::Exchange(format!(
                "userinfo endpoint returned {}",
                response.status()
            )));
        }
        let info: UserInfo = response
            .json()
            .await
            .map_err(|e| IdentityProviderError::Transport(e.to_string()))?;

        Ok(ExternalIdentity {
            subject: info.sub,
            email: info.email.unwrap_or_default(),
            display_name: info.name,
        })
    }
}
