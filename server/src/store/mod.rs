//! Persistence for events.
//!
//! [`EventStore`] is the seam between the HTTP handlers and storage. The
//! PostgreSQL backend is what runs in production; the in-memory backend
//! has the same semantics and backs the HTTP tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    CancelRequest, CreateRequest, DeleteRequest, Event, GetRequest, ListRequest,
    RescheduleRequest, UpdateDetailsRequest,
};

pub mod id;
pub mod memory;
pub mod postgres;

pub use id::IdGenerator;
pub use memory::MemoryEventStore;
pub use postgres::PostgresEventStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("event not found")]
    NotFound,

    #[error("event object is required")]
    ObjectRequired,

    #[error("event slot with start and end time is required")]
    SlotRequired,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Fetches a single event by id.
    async fn get(&self, req: &GetRequest) -> StoreResult<Event>;

    /// Events ordered by id ascending, after the cursor and filtered by name.
    async fn list(&self, req: &ListRequest) -> StoreResult<Vec<Event>>;

    /// Persists a new event. On success the event inside `req` carries its
    /// assigned id, status and creation time.
    async fn create(&self, req: &mut CreateRequest) -> StoreResult<()>;

    /// Overwrites the free-text fields and stamps `updated_on`.
    async fn update_details(&self, req: &UpdateDetailsRequest) -> StoreResult<()>;

    /// Marks the event cancelled and stamps `cancelled_on`.
    async fn cancel(&self, req: &CancelRequest) -> StoreResult<()>;

    /// Replaces the slot, marks the event rescheduled and stamps `rescheduled_on`.
    async fn reschedule(&self, req: &RescheduleRequest) -> StoreResult<()>;

    /// Hard delete.
    async fn delete(&self, req: &DeleteRequest) -> StoreResult<()>;
}
