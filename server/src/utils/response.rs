use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::{Event, EventResponse};

/// Error body. The status line always carries the same code.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(rename = "Code")]
    pub code: u16,
    #[serde(rename = "Message")]
    pub message: String,
}

pub fn success(body: EventResponse) -> Response {
    (StatusCode::OK, Json(body)).into_response()
}

pub fn single(event: Event) -> Response {
    success(EventResponse::single(event))
}

pub fn list(events: Vec<Event>) -> Response {
    success(EventResponse::list(events))
}

pub fn empty_success() -> Response {
    success(EventResponse::default())
}

pub fn error(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ApiErrorBody {
        code: status.as_u16(),
        message: message.into(),
    };

    (status, Json(body)).into_response()
}
