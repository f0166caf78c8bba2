use crate::application_port::AuthError;
use crate::domain_model::UserId;
use crate::domain_port::RefreshTokenStore;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

/// Process-local store for tests and single-node dev runs. Expiry is checked
/// lazily on read, which matches the redis adapter's observable behaviour.
#[derive(Default)]
pub struct MemoryRefreshTokenStore {
    entries: DashMap<String, (UserId, DateTime<Utc>)>,
}

impl MemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RefreshTokenStore for MemoryRefreshTokenStore {
    async fn put(&self, jti: &str, user_id: UserId, ttl_secs: u64) -> Result<(), AuthError> {
        let expires_at = Utc::now() + Duration::seconds(ttl_secs as i64);
        self.entries.insert(jti.to_string(), (user_id, expires_at));
        Ok(())
    }

    async fn get(&self, jti: &str) -> Result<Option<UserId>, AuthError> {
        match self.entries.get(jti) {
            Some(entry) => {
                let (user_id, expires_at) = *entry;
                drop(entry);
                if Utc::now() >= expires_at {
                    self.entries.remove(jti);
                    Ok(None)
                } else {
                    Ok(Some(user_id))
                }
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, jti: &str) -> Result<bool, AuthError> {
        Ok(self.entries.remove(jti).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uid() -> UserId {
        UserId(uuid::Uuid::new_v4())
    }

    #[tokio::test]
    async fn put_get_delete_round_trip() {
        let store = MemoryRefreshTokenStore::new();
        let user = uid();

        store.put("jti-1", user, 60).await.unwrap();
        assert_eq!(store.get("jti-1").await.unwrap(), Some(user));

        store.delete("jti-1").await.unwrap();
        assert_eq!(store.get("jti-1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_of_missing_entry_is_noop() {
        let store = MemoryRefreshTokenStore::new();
        assert!(!store.delete("never-stored").await.unwrap());
    }

    #[tokio::test]
    async fn expired_entry_reads_as_absent() {
        let store = MemoryRefreshTokenStore::new();
        store.put("jti-2", uid(), 0).await.unwrap();
        assert_eq!(store.get("jti-2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_is_an_upsert() {
        let store = MemoryRefreshTokenStore::new();
        let first = uid();
        let second = uid();

        store.put("jti-3", first, 60).await.unwrap();
        store.put("jti-3", second, 60).await.unwrap();
        assert_eq!(store.get("jti-3").await.unwrap(), Some(second));
    }
}
