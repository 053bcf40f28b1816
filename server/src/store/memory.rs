use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::event::now;
use crate::models::{
    CancelRequest, CreateRequest, DeleteRequest, Event, EventStatus, GetRequest, ListRequest,
    RescheduleRequest, TimeSlot, UpdateDetailsRequest,
};
use crate::store::{EventStore, IdGenerator, StoreError, StoreResult};

/// Event store kept in process memory, keyed and ordered by id.
#[derive(Clone)]
pub struct MemoryEventStore {
    events: Arc<RwLock<BTreeMap<String, Event>>>,
    ids: Arc<IdGenerator>,
}

impl MemoryEventStore {
    pub fn new(ids: Arc<IdGenerator>) -> Self {
        Self {
            events: Arc::new(RwLock::new(BTreeMap::new())),
            ids,
        }
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }

    async fn modify<F>(&self, id: &str, apply: F) -> StoreResult<()>
    where
        F: FnOnce(&mut Event) + Send,
    {
        let mut events = self.events.write().await;
        let event = events.get_mut(id).ok_or(StoreError::NotFound)?;
        apply(event);
        Ok(())
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn get(&self, req: &GetRequest) -> StoreResult<Event> {
        self.events
            .read()
            .await
            .get(&req.id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self, req: &ListRequest) -> StoreResult<Vec<Event>> {
        let limit = usize::try_from(req.effective_limit()).unwrap_or(usize::MAX);
        let lower = if req.after.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(req.after.clone())
        };
        let needle = req.name.to_lowercase();

        let events = self.events.read().await;
        Ok(events
            .range((lower, Bound::Unbounded))
            .map(|(_, event)| event)
            .filter(|event| needle.is_empty() || event.name.to_lowercase().contains(&needle))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn create(&self, req: &mut CreateRequest) -> StoreResult<()> {
        let event = req.event.as_mut().ok_or(StoreError::ObjectRequired)?;
        if !event.slot.as_ref().is_some_and(TimeSlot::is_complete) {
            return Err(StoreError::SlotRequired);
        }
        event.stamp_created(self.ids.generate(), now());

        self.events
            .write()
            .await
            .insert(event.id.clone(), event.clone());
        Ok(())
    }

    async fn update_details(&self, req: &UpdateDetailsRequest) -> StoreResult<()> {
        let at = now();
        self.modify(&req.id, |event| {
            event.name = req.name.clone();
            event.description = req.description.clone();
            event.website = req.website.clone();
            event.address = req.address.clone();
            event.phone_number = req.phone_number.clone();
            event.updated_on = Some(at);
        })
        .await
    }

    async fn cancel(&self, req: &CancelRequest) -> StoreResult<()> {
        let at = now();
        self.modify(&req.id, |event| {
            event.status = Some(EventStatus::Cancelled);
            event.cancelled_on = Some(at);
        })
        .await
    }

    async fn reschedule(&self, req: &RescheduleRequest) -> StoreResult<()> {
        let mut slot = req
            .new_slot
            .clone()
            .filter(TimeSlot::is_complete)
            .ok_or(StoreError::SlotRequired)?;
        slot.truncate_to_micros();

        let at = now();
        self.modify(&req.id, |event| {
            event.slot = Some(slot);
            event.status = Some(EventStatus::Rescheduled);
            event.rescheduled_on = Some(at);
        })
        .await
    }

    async fn delete(&self, req: &DeleteRequest) -> StoreResult<()> {
        self.events
            .write()
            .await
            .remove(&req.id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn store() -> MemoryEventStore {
        MemoryEventStore::new(Arc::new(IdGenerator::with_seed(42)))
    }

    async fn create(store: &MemoryEventStore, name: &str) -> Event {
        let start = Utc::now();
        let mut req = CreateRequest {
            event: Some(Event {
                name: name.to_string(),
                description: format!("Description of {name}"),
                website: format!("https://{name}.com"),
                slot: Some(TimeSlot::new(start, start + Duration::hours(1))),
                ..Default::default()
            }),
        };
        store.create(&mut req).await.unwrap();
        req.event.unwrap()
    }

    #[tokio::test]
    async fn test_create_then_get_returns_stamped_event() {
        let store = store();
        let created = create(&store, "Ok").await;

        assert!(!created.id.is_empty());
        assert_eq!(created.status, Some(EventStatus::Original));
        assert!(created.created_on.is_some());

        let fetched = store
            .get(&GetRequest {
                id: created.id.clone(),
            })
            .await
            .unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_requires_event_and_slot() {
        let store = store();

        let mut empty = CreateRequest::default();
        assert!(matches!(
            store.create(&mut empty).await,
            Err(StoreError::ObjectRequired)
        ));

        let mut no_slot = CreateRequest {
            event: Some(Event::default()),
        };
        assert!(matches!(
            store.create(&mut no_slot).await,
            Err(StoreError::SlotRequired)
        ));
        assert!(no_slot.event.unwrap().id.is_empty());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_list_cursor_limit_and_name() {
        let store = store();
        let one = create(&store, "One").await;
        let two = create(&store, "Two").await;
        let three = create(&store, "Three").await;

        let all = store.list(&ListRequest::default()).await.unwrap();
        let ids: Vec<&str> = all.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec![one.id.as_str(), two.id.as_str(), three.id.as_str()]);

        let after = store
            .list(&ListRequest {
                after: one.id.clone(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(after.len(), 2);
        assert_eq!(after[0].id, two.id);

        let limited = store
            .list(&ListRequest {
                limit: 1,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);

        let named = store
            .list(&ListRequest {
                name: "E".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        let names: Vec<&str> = named.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["One", "Three"]);
    }

    #[tokio::test]
    async fn test_list_clamps_limit() {
        let store = store();
        for i in 0..205 {
            create(&store, &format!("event-{i}")).await;
        }

        let unset = store.list(&ListRequest::default()).await.unwrap();
        assert_eq!(unset.len(), 200);

        let oversized = store
            .list(&ListRequest {
                limit: 1000,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(oversized.len(), 200);
    }

    #[tokio::test]
    async fn test_cancel_and_reschedule_touch_only_their_fields() {
        let store = store();
        let created = create(&store, "Ok").await;
        let get = GetRequest {
            id: created.id.clone(),
        };

        store
            .cancel(&CancelRequest {
                id: created.id.clone(),
            })
            .await
            .unwrap();
        let cancelled = store.get(&get).await.unwrap();
        assert_eq!(cancelled.status, Some(EventStatus::Cancelled));
        assert!(cancelled.cancelled_on.is_some());
        assert_eq!(cancelled.name, created.name);
        assert_eq!(cancelled.slot, created.slot);

        let start = Utc::now() + Duration::days(1);
        let new_slot = TimeSlot::new(start, start + Duration::hours(2));
        store
            .reschedule(&RescheduleRequest {
                id: created.id.clone(),
                new_slot: Some(new_slot.clone()),
            })
            .await
            .unwrap();
        let rescheduled = store.get(&get).await.unwrap();
        let mut expected_slot = new_slot;
        expected_slot.truncate_to_micros();
        assert_eq!(rescheduled.status, Some(EventStatus::Rescheduled));
        assert_eq!(rescheduled.slot, Some(expected_slot));
        assert!(rescheduled.rescheduled_on.is_some());
        assert_eq!(rescheduled.cancelled_on, cancelled.cancelled_on);
        assert_eq!(rescheduled.website, created.website);
    }

    #[tokio::test]
    async fn test_writes_to_missing_event_are_not_found() {
        let store = store();
        let id = "fake".to_string();

        assert!(matches!(
            store.cancel(&CancelRequest { id: id.clone() }).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store
                .update_details(&UpdateDetailsRequest {
                    id: id.clone(),
                    ..Default::default()
                })
                .await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.delete(&DeleteRequest { id }).await,
            Err(StoreError::NotFound)
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_removes_event() {
        let store = store();
        let created = create(&store, "Ok").await;

        store
            .delete(&DeleteRequest {
                id: created.id.clone(),
            })
            .await
            .unwrap();

        assert!(matches!(
            store.get(&GetRequest { id: created.id }).await,
            Err(StoreError::NotFound)
        ));
        assert_eq!(store.len().await, 0);
    }
}
