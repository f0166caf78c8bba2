use crate::application_port::{ExternalIdentity, IdentityProvider, IdentityProviderError};

/// Offline stand-in for the login protocol. The "authorization code" encodes
/// the identity directly: `fake:<subject>:<email>[:<display name>]`.
/// Minimal fake for dev and tests only.
#[derive(Debug)]
pub struct FakeIdentityProvider {
    callback_url: String,
}

impl FakeIdentityProvider {
    pub fn new(callback_url: impl Into<String>) -> Self {
        FakeIdentityProvider {
            callback_url: callback_url.into(),
        }
    }
}

#[async_trait::async_trait]
impl IdentityProvider for FakeIdentityProvider {
    fn authorize_url(&self) -> String {
        format!("{}?code=fake:dev:dev@example.com:Dev", self.callback_url)
    }

    async fn exchange_code(&self, code: &str) -> Result<ExternalIdentity, IdentityProviderError> {
        let Some(rest) = code.strip_prefix("fake:") else {
            return Err(IdentityProviderError::Exchange(
                "unknown authorization code".to_string(),
            ));
        };

        let mut parts = rest.splitn(3, ':');
        let subject = parts.next().unwrap_or_default().to_string();
        let email = parts.next().unwrap_or_default().to_string();
        let display_name = parts.next().filter(|s| !s.is_empty()).map(str::to_string);

        Ok(ExternalIdentity {
            subject,
            email,
            display_name,
        })
    }
}
