use crate::application_port::AuthError;
use crate::domain_model::{User, UserId};

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// Resolve-or-create by the provider's stable subject id. Email and
    /// display name are refreshed on every login.
    async fn upsert_external_user(
        &self,
        external_subject: &str,
        email: &str,
        display_name: Option<&str>,
    ) -> Result<User, AuthError>;

    async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>, AuthError>;
}
