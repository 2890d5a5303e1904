use fusha_core::model::UserId;
use tracing::{info, warn};

use crate::repository::KeyValueStore;

/// Storage key holding this device's user identifier.
pub const USER_ID_KEY: &str = "fusha_user_id";

/// Returns the persisted user identifier, creating one on first use.
///
/// If the identifier cannot be read or saved, a fresh one is still returned
/// and used for the session; progress recorded under it may then not be found
/// next time.
pub async fn ensure_user_id(kv: &dyn KeyValueStore) -> UserId {
    match kv.get(USER_ID_KEY).await {
        Ok(Some(raw)) => {
            if let Ok(id) = raw.parse::<UserId>() {
                return id;
            }
            warn!(key = USER_ID_KEY, "blank user id replaced");
        }
        Ok(None) => {}
        Err(err) => {
            warn!(key = USER_ID_KEY, error = %err, "user id unreadable");
        }
    }

    let id = UserId::generate();
    match kv.set(USER_ID_KEY, id.as_str()).await {
        Ok(()) => info!(user_id = %id, "generated user id"),
        Err(err) => warn!(key = USER_ID_KEY, error = %err, "failed to persist user id"),
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;

    #[tokio::test]
    async fn user_id_is_stable_once_created() {
        let repo = InMemoryRepository::new();
        let first = ensure_user_id(&repo).await;
        let second = ensure_user_id(&repo).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn existing_user_id_is_reused() {
        let repo = InMemoryRepository::new();
        repo.put_raw(USER_ID_KEY, "user_1700000000_abc");
        assert_eq!(
            ensure_user_id(&repo).await,
            UserId::new("user_1700000000_abc")
        );
    }

    #[tokio::test]
    async fn blank_user_id_is_regenerated() {
        let repo = InMemoryRepository::new();
        repo.put_raw(USER_ID_KEY, "   ");
        let id = ensure_user_id(&repo).await;
        assert!(!id.as_str().trim().is_empty());
        assert_eq!(repo.get(USER_ID_KEY).await.unwrap().as_deref(), Some(id.as_str()));
    }

    #[tokio::test]
    async fn unwritable_store_still_yields_an_id() {
        let repo = InMemoryRepository::new();
        repo.set_fail_writes(true);
        let id = ensure_user_id(&repo).await;
        assert!(!id.as_str().is_empty());
        assert_eq!(repo.get(USER_ID_KEY).await.unwrap(), None);
    }
}
