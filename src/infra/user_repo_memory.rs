use crate::application_port::AuthError;
use crate::domain_model::{User, UserId};
use crate::domain_port::UserRepo;
use dashmap::DashMap;

#[derive(Default)]
pub struct MemoryUserRepo {
    users: DashMap<UserId, User>,
    by_subject: DashMap<String, UserId>,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserRepo for MemoryUserRepo {
    async fn find_by_external_subject(&self, subject: &str) -> Result<Option<User>, AuthError> {
        let Some(id) = self.by_subject.get(subject).map(|e| *e) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|e| e.clone()))
    }

    async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>, AuthError> {
        Ok(self.users.get(&user_id).map(|e| e.clone()))
    }

    async fn save(&self, user: User) -> Result<User, AuthError> {
        self.by_subject
            .insert(user.external_subject.clone(), user.user_id);
        self.users.insert(user.user_id, user.clone());
        Ok(user)
    }
}
