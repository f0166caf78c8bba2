use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum IdentityProviderError {
    #[error("code exchange rejected: {0}")]
    Exchange(String),
    #[error("provider transport error: {0}")]
    Transport(String),
}

/// Identity claim as verified by the external login protocol.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalIdentity {
    pub subject: String,
    pub email: String,
    pub display_name: Option<String>,
}

/// Boundary to the redirect-based login protocol. The handshake itself is
/// the provider's business; this service only consumes its outcome.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Entry point the login endpoint redirects the browser to.
    fn authorize_url(&self) -> String;

    /// Exchanges the callback authorization code for a verified identity.
    async fn exchange_code(&self, code: &str) -> Result<ExternalIdentity, IdentityProviderError>;
}
