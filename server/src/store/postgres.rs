use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgQueryResult;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::debug;

use crate::models::event::now;
use crate::models::{
    CancelRequest, CreateRequest, DeleteRequest, Event, EventStatus, GetRequest, ListRequest,
    RescheduleRequest, TimeSlot, UpdateDetailsRequest,
};
use crate::store::{EventStore, IdGenerator, StoreError, StoreResult};

const SELECT_EVENTS: &str = "SELECT id, name, description, website, address, phone_number, \
     start_time, end_time, status, created_on, updated_on, cancelled_on, rescheduled_on \
     FROM events";

#[derive(Debug, FromRow)]
struct EventRow {
    id: String,
    name: String,
    description: String,
    website: String,
    address: String,
    phone_number: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    status: String,
    created_on: Option<DateTime<Utc>>,
    updated_on: Option<DateTime<Utc>>,
    cancelled_on: Option<DateTime<Utc>>,
    rescheduled_on: Option<DateTime<Utc>>,
}

impl TryFrom<EventRow> for Event {
    type Error = StoreError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<EventStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Event {
            id: row.id,
            name: row.name,
            description: row.description,
            website: row.website,
            address: row.address,
            phone_number: row.phone_number,
            slot: Some(TimeSlot::new(row.start_time, row.end_time)),
            status: Some(status),
            created_on: row.created_on,
            updated_on: row.updated_on,
            cancelled_on: row.cancelled_on,
            rescheduled_on: row.rescheduled_on,
        })
    }
}

/// Escapes `LIKE` metacharacters so the filter matches literally.
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn expect_row(result: PgQueryResult) -> StoreResult<()> {
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

/// Event store backed by the `events` table.
#[derive(Clone)]
pub struct PostgresEventStore {
    pool: PgPool,
    ids: Arc<IdGenerator>,
}

impl PostgresEventStore {
    pub fn new(pool: PgPool, ids: Arc<IdGenerator>) -> Self {
        Self { pool, ids }
    }

    /// Applies the embedded migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!().run(&self.pool).await
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl EventStore for PostgresEventStore {
    async fn get(&self, req: &GetRequest) -> StoreResult<Event> {
        let row = sqlx::query_as::<_, EventRow>(&format!("{SELECT_EVENTS} WHERE id = $1"))
            .bind(&req.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;

        Event::try_from(row)
    }

    async fn list(&self, req: &ListRequest) -> StoreResult<Vec<Event>> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(SELECT_EVENTS);
        query.push(" WHERE TRUE");
        if !req.after.is_empty() {
            query.push(" AND id > ").push_bind(req.after.clone());
        }
        if !req.name.is_empty() {
            query
                .push(" AND name ILIKE ")
                .push_bind(like_pattern(&req.name));
        }
        query
            .push(" ORDER BY id LIMIT ")
            .push_bind(req.effective_limit());

        let rows = query
            .build_query_as::<EventRow>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), after = %req.after, name = %req.name, "Listed events");

        rows.into_iter().map(Event::try_from).collect()
    }

    async fn create(&self, req: &mut CreateRequest) -> StoreResult<()> {
        let event = req.event.as_mut().ok_or(StoreError::ObjectRequired)?;
        let slot = event
            .slot
            .clone()
            .filter(TimeSlot::is_complete)
            .ok_or(StoreError::SlotRequired)?;
        event.stamp_created(self.ids.generate(), now());
        let slot = event.slot.clone().unwrap_or(slot);

        sqlx::query(
            r#"
            INSERT INTO events
                (id, name, description, website, address, phone_number,
                 start_time, end_time, status, created_on)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&event.id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(&event.website)
        .bind(&event.address)
        .bind(&event.phone_number)
        .bind(slot.start_time)
        .bind(slot.end_time)
        .bind(EventStatus::Original.as_str())
        .bind(event.created_on)
        .execute(&self.pool)
        .await?;

        debug!(id = %event.id, "Created event");
        Ok(())
    }

    async fn update_details(&self, req: &UpdateDetailsRequest) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET name = $2, description = $3, website = $4, address = $5,
                phone_number = $6, updated_on = $7
            WHERE id = $1
            "#,
        )
        .bind(&req.id)
        .bind(&req.name)
        .bind(&req.description)
        .bind(&req.website)
        .bind(&req.address)
        .bind(&req.phone_number)
        .bind(now())
        .execute(&self.pool)
        .await?;

        expect_row(result)
    }

    async fn cancel(&self, req: &CancelRequest) -> StoreResult<()> {
        let result =
            sqlx::query("UPDATE events SET status = $2, cancelled_on = $3 WHERE id = $1")
                .bind(&req.id)
                .bind(EventStatus::Cancelled.as_str())
                .bind(now())
                .execute(&self.pool)
                .await?;

        expect_row(result)
    }

    async fn reschedule(&self, req: &RescheduleRequest) -> StoreResult<()> {
        let mut slot = req
            .new_slot
            .clone()
            .filter(TimeSlot::is_complete)
            .ok_or(StoreError::SlotRequired)?;
        slot.truncate_to_micros();

        let result = sqlx::query(
            r#"
            UPDATE events
            SET status = $2, start_time = $3, end_time = $4, rescheduled_on = $5
            WHERE id = $1
            "#,
        )
        .bind(&req.id)
        .bind(EventStatus::Rescheduled.as_str())
        .bind(slot.start_time)
        .bind(slot.end_time)
        .bind(now())
        .execute(&self.pool)
        .await?;

        expect_row(result)
    }

    async fn delete(&self, req: &DeleteRequest) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(&req.id)
            .execute(&self.pool)
            .await?;

        expect_row(result)
    }
}
