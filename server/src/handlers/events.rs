use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::Response;
use serde::Deserialize;
use tracing::{debug, info};

use crate::handlers::validation::{check_slot, decode_body, parse_limit, require_id};
use crate::models::{
    CancelRequest, CreateRequest, DeleteRequest, Event, GetRequest, ListRequest,
    RescheduleRequest, UpdateDetailsRequest,
};
use crate::state::AppState;
use crate::store::EventStore;
use crate::utils::response::{empty_success, list, single};
use crate::utils::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<String>,
    pub after: Option<String>,
    pub name: Option<String>,
}

fn query_or_bad_request<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query.map(|Query(q)| q).map_err(|e| {
        debug!(error = %e, "Rejected query string");
        ApiError::BadRequest
    })
}

fn readable(body: Result<Bytes, BytesRejection>) -> Result<Bytes, ApiError> {
    body.map_err(|e| {
        debug!(error = %e, "Failed to read request body");
        ApiError::UnprocessableEntity
    })
}

/// Looks the event up before a write. The write can still race with a
/// concurrent delete; the stores answer that case with `NotFound` too.
async fn ensure_exists(store: &dyn EventStore, id: &str) -> Result<(), ApiError> {
    store
        .get(&GetRequest { id: id.to_string() })
        .await
        .map(|_| ())
        .map_err(ApiError::from)
}

/// `GET /event?id=`
pub async fn get_event(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let id = require_id(query_or_bad_request(query)?.id)?;

    let event = state.store.get(&GetRequest { id }).await?;
    Ok(single(event))
}

/// `GET /events?limit=&after=&name=`
pub async fn list_events(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let query = query_or_bad_request(query)?;
    let req = ListRequest {
        limit: parse_limit(query.limit.as_deref())?,
        after: query.after.unwrap_or_default(),
        name: query.name.unwrap_or_default(),
    };

    let events = state.store.list(&req).await?;
    Ok(list(events))
}

/// `POST /event`
pub async fn create_event(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let body = readable(body)?;
    let event: Event = decode_body(&body)?;
    check_slot(event.slot.as_ref())?;

    let mut req = CreateRequest { event: Some(event) };
    state.store.create(&mut req).await?;

    let event = req.event.ok_or(ApiError::ObjectIsRequired)?;
    info!(id = %event.id, "Event created");
    Ok(single(event))
}

/// `PUT /event/details`
pub async fn update_event_details(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let body = readable(body)?;
    let req: UpdateDetailsRequest = decode_body(&body)?;

    ensure_exists(state.store.as_ref(), &req.id).await?;
    state.store.update_details(&req).await?;

    info!(id = %req.id, "Event details updated");
    Ok(empty_success())
}

/// `PATCH /event/cancel?id=`
pub async fn cancel_event(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let id = require_id(query_or_bad_request(query)?.id)?;

    ensure_exists(state.store.as_ref(), &id).await?;
    state.store.cancel(&CancelRequest { id: id.clone() }).await?;

    info!(id = %id, "Event cancelled");
    Ok(empty_success())
}

/// `PATCH /event/reschedule`
pub async fn reschedule_event(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let body = readable(body)?;
    let req: RescheduleRequest = decode_body(&body)?;
    check_slot(req.new_slot.as_ref())?;

    ensure_exists(state.store.as_ref(), &req.id).await?;
    state.store.reschedule(&req).await?;

    info!(id = %req.id, "Event rescheduled");
    Ok(empty_success())
}

/// `DELETE /event?id=`
pub async fn delete_event(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let id = require_id(query_or_bad_request(query)?.id)?;

    ensure_exists(state.store.as_ref(), &id).await?;
    state.store.delete(&DeleteRequest { id: id.clone() }).await?;

    info!(id = %id, "Event deleted");
    Ok(empty_success())
}
