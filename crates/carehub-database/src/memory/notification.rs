//! In-memory notification store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use carehub_core::result::AppResult;
use carehub_core::types::{NotificationId, PageRequest, PageResponse, UserId};
use carehub_entity::notification::{NewNotification, Notification};

use crate::store::{InsertOutcome, NotificationStore};

#[derive(Debug, Default)]
struct State {
    records: HashMap<NotificationId, Notification>,
    dedup_keys: HashMap<String, NotificationId>,
}

/// Notification store held entirely in memory.
///
/// The dedup-key check and the insert run under one write lock, so the
/// key constraint holds exactly like a unique index.
#[derive(Debug, Default)]
pub struct MemoryNotificationStore {
    state: RwLock<State>,
}

impl MemoryNotificationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-formed record, bypassing dedup. Used to seed fixtures.
    pub async fn seed(&self, notification: Notification) {
        let mut state = self.state.write().await;
        state.records.insert(notification.id, notification);
    }

    /// Total number of stored records, expired ones included.
    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Look up a record regardless of owner or age.
    pub async fn get(&self, id: NotificationId) -> Option<Notification> {
        self.state.read().await.records.get(&id).cloned()
    }
}

fn newest_first(a: &Notification, b: &Notification) -> std::cmp::Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.0.cmp(&a.id.0))
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn find_recent_duplicate(
        &self,
        draft: &NewNotification,
        since: DateTime<Utc>,
    ) -> AppResult<Option<Notification>> {
        let state = self.state.read().await;
        Ok(state
            .records
            .values()
            .filter(|n| n.created_at >= since && draft.matches(n))
            .max_by_key(|n| n.created_at)
            .cloned())
    }

    async fn insert(
        &self,
        draft: NewNotification,
        dedup_key: String,
        now: DateTime<Utc>,
    ) -> AppResult<InsertOutcome> {
        let mut state = self.state.write().await;
        if let Some(existing) = state
            .dedup_keys
            .get(&dedup_key)
            .and_then(|id| state.records.get(id))
        {
            return Ok(InsertOutcome::Duplicate(existing.clone()));
        }

        let notification = draft.into_notification(NotificationId::new(), now);
        state.dedup_keys.insert(dedup_key, notification.id);
        state.records.insert(notification.id, notification.clone());
        Ok(InsertOutcome::Created(notification))
    }

    async fn find_page(
        &self,
        recipient: UserId,
        page: &PageRequest,
        unread_only: bool,
        visible_since: DateTime<Utc>,
    ) -> AppResult<PageResponse<Notification>> {
        let state = self.state.read().await;
        let mut matching: Vec<&Notification> = state
            .records
            .values()
            .filter(|n| n.recipient.id == recipient && n.created_at > visible_since)
            .filter(|n| !unread_only || n.is_unread())
            .collect();
        matching.sort_by(|a, b| newest_first(a, b));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn count_unread(
        &self,
        recipient: UserId,
        visible_since: DateTime<Utc>,
    ) -> AppResult<u64> {
        let state = self.state.read().await;
        Ok(state
            .records
            .values()
            .filter(|n| n.recipient.id == recipient && n.is_unread())
            .filter(|n| n.created_at > visible_since)
            .count() as u64)
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        recipient: UserId,
        visible_since: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Notification>> {
        let mut state = self.state.write().await;
        Ok(state
            .records
            .get_mut(&id)
            .filter(|n| n.recipient.id == recipient && n.created_at > visible_since)
            .map(|n| {
                n.is_read = true;
                n.updated_at = now;
                n.clone()
            }))
    }

    async fn mark_all_read(
        &self,
        recipient: UserId,
        visible_since: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let mut modified = 0;
        for n in state.records.values_mut() {
            if n.recipient.id == recipient && n.is_unread() && n.created_at > visible_since {
                n.is_read = true;
                n.updated_at = now;
                modified += 1;
            }
        }
        Ok(modified)
    }

    async fn delete(
        &self,
        id: NotificationId,
        recipient: UserId,
        visible_since: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let owned = state
            .records
            .get(&id)
            .is_some_and(|n| n.recipient.id == recipient && n.created_at > visible_since);
        if owned {
            state.records.remove(&id);
            state.dedup_keys.retain(|_, v| *v != id);
        }
        Ok(owned)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let before = state.records.len();
        state.records.retain(|_, n| n.created_at >= cutoff);
        let State {
            records,
            dedup_keys,
        } = &mut *state;
        dedup_keys.retain(|_, id| records.contains_key(id));
        Ok((before - records.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use carehub_core::types::PostId;
    use carehub_entity::notification::{ActorSnapshot, NotificationPayload, PostLikedData};

    use super::*;

    fn like(recipient: &ActorSnapshot, sender: &ActorSnapshot, post_id: PostId) -> NewNotification {
        NewNotification {
            recipient: recipient.clone(),
            sender: sender.clone(),
            payload: NotificationPayload::PostLiked(PostLikedData {
                post_id,
                post_title: "Clinic hours".into(),
            }),
            message: format!("{} liked your post", sender.name),
        }
    }

    fn actors() -> (ActorSnapshot, ActorSnapshot) {
        (
            ActorSnapshot::new(UserId::new(), "Bea"),
            ActorSnapshot::new(UserId::new(), "Al"),
        )
    }

    #[tokio::test]
    async fn test_same_dedup_key_returns_existing() {
        let store = MemoryNotificationStore::new();
        let (bea, al) = actors();
        let now = Utc::now();
        let post = PostId::new();

        let first = store
            .insert(like(&bea, &al, post), "k1".into(), now)
            .await
            .unwrap();
        let second = store
            .insert(like(&bea, &al, post), "k1".into(), now)
            .await
            .unwrap();

        assert!(first.is_created());
        assert!(!second.is_created());
        assert_eq!(first.into_inner().id, second.into_inner().id);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_page_is_newest_first_and_scoped() {
        let store = MemoryNotificationStore::new();
        let (bea, al) = actors();
        let start = Utc::now() - Duration::hours(1);
        for i in 0..5 {
            store
                .insert(
                    like(&bea, &al, PostId::new()),
                    format!("k{i}"),
                    start + Duration::minutes(i),
                )
                .await
                .unwrap();
        }
        store
            .insert(like(&al, &bea, PostId::new()), "other".into(), start)
            .await
            .unwrap();

        let page = store
            .find_page(bea.id, &PageRequest::new(1, 3), false, start - Duration::days(30))
            .await
            .unwrap();
        assert_eq!(page.total_items, 5);
        assert_eq!(page.items.len(), 3);
        assert!(page.items[0].created_at > page.items[1].created_at);
    }

    #[tokio::test]
    async fn test_delete_requires_owner() {
        let store = MemoryNotificationStore::new();
        let (bea, al) = actors();
        let created = store
            .insert(like(&bea, &al, PostId::new()), "k".into(), Utc::now())
            .await
            .unwrap()
            .into_inner();

        let visible_since = Utc::now() - Duration::days(30);
        assert!(!store.delete(created.id, al.id, visible_since).await.unwrap());
        assert!(store.delete(created.id, bea.id, visible_since).await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_expired_records_are_out_of_reach() {
        let store = MemoryNotificationStore::new();
        let (bea, al) = actors();
        let now = Utc::now();
        let old = store
            .insert(like(&bea, &al, PostId::new()), "old".into(), now - Duration::days(31))
            .await
            .unwrap()
            .into_inner();
        store
            .insert(like(&bea, &al, PostId::new()), "new".into(), now)
            .await
            .unwrap();

        let visible_since = now - Duration::days(30);
        assert_eq!(store.mark_all_read(bea.id, visible_since, now).await.unwrap(), 1);
        assert!(!store.delete(old.id, bea.id, visible_since).await.unwrap());
        assert!(store.get(old.id).await.is_some_and(|n| n.is_unread()));
    }

    #[tokio::test]
    async fn test_page_far_past_the_end_is_empty() {
        let store = MemoryNotificationStore::new();
        let (bea, al) = actors();
        store
            .insert(like(&bea, &al, PostId::new()), "k".into(), Utc::now())
            .await
            .unwrap();

        let page = store
            .find_page(
                bea.id,
                &PageRequest::new(u64::MAX, 20),
                false,
                Utc::now() - Duration::days(30),
            )
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 1);
        assert_eq!(page.total_pages, 1);
    }

    #[tokio::test]
    async fn test_purge_frees_dedup_key() {
        let store = MemoryNotificationStore::new();
        let (bea, al) = actors();
        let old = Utc::now() - Duration::days(40);
        store
            .insert(like(&bea, &al, PostId::new()), "k".into(), old)
            .await
            .unwrap();

        let removed = store
            .delete_older_than(Utc::now() - Duration::days(30))
            .await
            .unwrap();
        assert_eq!(removed, 1);

        let again = store
            .insert(like(&bea, &al, PostId::new()), "k".into(), Utc::now())
            .await
            .unwrap();
        assert!(again.is_created());
    }
}
