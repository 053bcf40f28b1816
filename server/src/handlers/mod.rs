use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::utils::ApiError;

pub mod events;
pub mod validation;

pub use events::{
    cancel_event, create_event, delete_event, get_event, list_events, reschedule_event,
    update_event_details,
};

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "events-api",
    };

    Json(payload).into_response()
}

pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}
