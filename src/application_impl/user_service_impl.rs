use crate::application_port::{AuthError, UserService};
use crate::domain_model::{User, UserId, UserStatus};
use crate::domain_port::UserRepo;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub struct RealUserService {
    user_repo: Arc<dyn UserRepo>,
}

impl RealUserService {
    pub fn new(user_repo: Arc<dyn UserRepo>) -> RealUserService {
        RealUserService { user_repo }
    }
}

#[async_trait::async_trait]
impl UserService for RealUserService {
    async fn upsert_external_user(
        &self,
        external_subject: &str,
        email: &str,
        display_name: Option<&str>,
    ) -> Result<User, AuthError> {
        let user = match self
            .user_repo
            .find_by_external_subject(external_subject)
            .await?
        {
            Some(mut existing) => {
                // Email and display name track the provider; identity and
                // status stay put.
                existing.email = email.to_string();
                existing.display_name = display_name.map(str::to_string);
                existing
            }
            None => User {
                user_id: UserId(Uuid::new_v4()),
                external_subject: external_subject.to_string(),
                email: email.to_string(),
                display_name: display_name.map(str::to_string),
                status: UserStatus::Active,
                created_at: Utc::now(),
            },
        };

        self.user_repo.save(user).await
    }

    async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>, AuthError> {
        self.user_repo.find_by_id(user_id).await
    }
}
