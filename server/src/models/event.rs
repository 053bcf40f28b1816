use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle status of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Original,
    Cancelled,
    Rescheduled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Original => "original",
            EventStatus::Cancelled => "cancelled",
            EventStatus::Rescheduled => "rescheduled",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown event status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for EventStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "original" => Ok(EventStatus::Original),
            "cancelled" => Ok(EventStatus::Cancelled),
            "rescheduled" => Ok(EventStatus::Rescheduled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Start and end of an event. Either side may be missing on input; the
/// handlers reject slots that are not fully set before they reach a store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl TimeSlot {
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            start_time: Some(start_time),
            end_time: Some(end_time),
        }
    }

    /// Both ends set to an instant after `0001-01-01T00:00:00Z`.
    pub fn is_complete(&self) -> bool {
        is_set(self.start_time) && is_set(self.end_time)
    }

    /// Drops sub-microsecond precision, which the database does not keep.
    pub fn truncate_to_micros(&mut self) {
        self.start_time = self.start_time.map(|t| t.trunc_subsecs(6));
        self.end_time = self.end_time.map(|t| t.trunc_subsecs(6));
    }
}

fn is_set(instant: Option<DateTime<Utc>>) -> bool {
    match instant {
        Some(t) => t > zero_instant(),
        None => false,
    }
}

/// `0001-01-01T00:00:00Z`, the value clients send for an unset time.
pub fn zero_instant() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Server clock, truncated to the precision the database stores.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub website: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone_number: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<TimeSlot>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_on: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rescheduled_on: Option<DateTime<Utc>>,
}

impl Event {
    /// Stamps the server-owned fields of a new event and discards any
    /// client-supplied meta timestamps.
    pub fn stamp_created(&mut self, id: String, at: DateTime<Utc>) {
        self.id = id;
        self.status = Some(EventStatus::Original);
        self.created_on = Some(at);
        self.updated_on = None;
        self.cancelled_on = None;
        self.rescheduled_on = None;
        if let Some(slot) = self.slot.as_mut() {
            slot.truncate_to_micros();
        }
    }
}
