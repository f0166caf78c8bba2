use crate::application_port::AuthError;
use crate::domain_model::{User, UserId};

#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_external_subject(&self, subject: &str) -> Result<Option<User>, AuthError>;

    async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>, AuthError>;

    /// Insert or update; the subject id is the natural key.
    async fn save(&self, user: User) -> Result<User, AuthError>;
}
