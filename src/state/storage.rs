//! Draft storage
//!
//! Drafts live in process memory keyed by user ID. Each call is atomic per
//! key; a dialogue turn's load, change and store sequence is not.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use dashmap::DashMap;
use tracing::debug;
use super::context::PlaceDraft;

#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn store(&self, user_id: i64, draft: PlaceDraft);

    /// Draft for `user_id`, if one is in progress
    async fn load(&self, user_id: i64) -> Option<PlaceDraft>;

    async fn delete(&self, user_id: i64);
}

/// [`DraftStore`] over a concurrent map; drafts older than the TTL are
/// dropped when next loaded, and swept from every key on each store
#[derive(Debug, Default)]
pub struct InMemoryDraftStore {
    drafts: DashMap<i64, PlaceDraft>,
    ttl: Option<Duration>,
}

impl InMemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            drafts: DashMap::new(),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    fn evict_expired(&self) {
        let Some(ttl) = self.ttl else { return };
        let now = Utc::now();
        let before = self.drafts.len();
        self.drafts.retain(|_, draft| !draft.is_expired(ttl, now));

        let evicted = before.saturating_sub(self.drafts.len());
        if evicted > 0 {
            debug!(evicted = evicted, "Evicted abandoned drafts");
        }
    }
}

#[async_trait]
impl DraftStore for InMemoryDraftStore {
    async fn store(&self, user_id: i64, draft: PlaceDraft) {
        self.evict_expired();
        self.drafts.insert(user_id, draft);
    }

    async fn load(&self, user_id: i64) -> Option<PlaceDraft> {
        let draft = self.drafts.get(&user_id).map(|entry| entry.value().clone())?;

        if let Some(ttl) = self.ttl {
            if draft.is_expired(ttl, Utc::now()) {
                self.drafts
                    .remove_if(&user_id, |_, stored| stored.started_at == draft.started_at);
                debug!(user_id = user_id, "Dropped expired draft");
                return None;
            }
        }

        Some(draft)
    }

    async fn delete(&self, user_id: i64) {
        self.drafts.remove(&user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_store_load_delete() {
        let store = InMemoryDraftStore::new();
        assert!(store.load(1).await.is_none());

        let draft = PlaceDraft::new(1);
        store.store(1, draft.clone()).await;
        assert_eq!(store.load(1).await, Some(draft));
        assert_eq!(store.len(), 1);

        store.delete(1).await;
        assert!(store.load(1).await.is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_store_replaces_existing_draft() {
        let store = InMemoryDraftStore::new();
        store.store(1, PlaceDraft::new(1)).await;
        let named = PlaceDraft::new(1).with_name("Beach").unwrap();
        store.store(1, named.clone()).await;

        assert_eq!(store.load(1).await, Some(named));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_expired_draft_is_dropped() {
        let store = InMemoryDraftStore::with_ttl(Some(Duration::minutes(30)));
        let mut stale = PlaceDraft::new(1);
        stale.started_at = Utc::now() - Duration::hours(1);
        store.store(1, stale).await;
        store.store(2, PlaceDraft::new(2)).await;

        assert!(store.load(1).await.is_none());
        assert!(store.load(2).await.is_some());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_abandoned_drafts_evicted_on_store() {
        let store = InMemoryDraftStore::with_ttl(Some(Duration::minutes(30)));
        for user_id in 1..=1000i64 {
            let mut abandoned = PlaceDraft::new(user_id);
            abandoned.started_at = Utc::now() - Duration::hours(5);
            store.drafts.insert(user_id, abandoned);
        }
        store.store(2000, PlaceDraft::new(2000)).await;

        assert!(store.load(2000).await.is_some());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_without_ttl_drafts_never_expire() {
        let store = InMemoryDraftStore::with_ttl(None);
        let mut old = PlaceDraft::new(1);
        old.started_at = Utc::now() - Duration::days(365);
        store.store(1, old).await;

        assert!(store.load(1).await.is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_users_do_not_interfere() {
        let store = Arc::new(InMemoryDraftStore::new());

        let tasks: Vec<_> = (1..=50i64)
            .map(|user_id| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store.store(user_id, PlaceDraft::new(user_id)).await;
                    let draft = store.load(user_id).await.unwrap();
                    let named = draft.with_name(&format!("place-{}", user_id)).unwrap();
                    store.store(user_id, named).await;
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(store.len(), 50);
        for user_id in 1..=50i64 {
            let draft = store.load(user_id).await.unwrap();
            assert_eq!(draft.user_id, user_id);
            assert_eq!(
                draft.into_place(1).unwrap().place_name,
                format!("place-{}", user_id)
            );
        }
    }
}
