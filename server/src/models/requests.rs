use serde::{Deserialize, Serialize};

use crate::models::event::{Event, TimeSlot};

/// Upper bound on the number of events a single list call returns.
pub const MAX_LIST_LIMIT: i64 = 200;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GetRequest {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListRequest {
    #[serde(default)]
    pub limit: i64,
    /// Cursor: only ids strictly greater than this are returned.
    #[serde(default)]
    pub after: String,
    /// Case-insensitive substring filter on the name.
    #[serde(default)]
    pub name: String,
}

impl ListRequest {
    /// Zero, negative and oversized limits all fall back to the maximum.
    pub fn effective_limit(&self) -> i64 {
        if self.limit <= 0 || self.limit > MAX_LIST_LIMIT {
            MAX_LIST_LIMIT
        } else {
            self.limit
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateRequest {
    pub event: Option<Event>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDetailsRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CancelRequest {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescheduleRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_slot: Option<TimeSlot>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeleteRequest {
    #[serde(default)]
    pub id: String,
}

/// Body of every successful response. Mutations answer with both fields
/// unset, which serializes to `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<Event>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<Event>>,
}

impl EventResponse {
    pub fn single(event: Event) -> Self {
        Self {
            event: Some(event),
            events: None,
        }
    }

    pub fn list(events: Vec<Event>) -> Self {
        Self {
            event: None,
            events: Some(events),
        }
    }
}
