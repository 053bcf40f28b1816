//! Request parsing shared by the event handlers. Each helper returns the
//! first validation failure as the matching [`ApiError`].

use axum::body::Bytes;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::TimeSlot;
use crate::utils::ApiError;

/// Decodes a JSON body. Empty and `null` bodies count as missing.
pub fn decode_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    let trimmed = trim_whitespace(body);
    if trimmed.is_empty() || trimmed == b"null" {
        return Err(ApiError::ObjectIsRequired);
    }
    serde_json::from_slice(trimmed).map_err(|e| {
        debug!(error = %e, "Rejected request body");
        ApiError::BadRequest
    })
}

fn trim_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}

pub fn require_id(id: Option<String>) -> Result<String, ApiError> {
    match id {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(ApiError::ValidEventIdIsRequired),
    }
}

/// Absent or empty limits are unset and left for the store to clamp.
pub fn parse_limit(limit: Option<&str>) -> Result<i64, ApiError> {
    match limit {
        None | Some("") => Ok(0),
        Some(raw) => raw.parse::<i64>().map_err(|e| {
            debug!(limit = raw, error = %e, "Rejected list limit");
            ApiError::InvalidLimit
        }),
    }
}

pub fn check_slot(slot: Option<&TimeSlot>) -> Result<(), ApiError> {
    let slot = slot.ok_or(ApiError::EventTimingIsRequired)?;
    if !slot.is_complete() {
        return Err(ApiError::InvalidTimeFormat);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Event, UpdateDetailsRequest};
    use chrono::{Duration, Utc};

    #[test]
    fn test_decode_body_missing_object() {
        for body in ["", "  ", "null", " null\n"] {
            let result = decode_body::<Event>(&Bytes::from(body));
            assert!(matches!(result, Err(ApiError::ObjectIsRequired)), "{body:?}");
        }
    }

    #[test]
    fn test_decode_body_malformed() {
        let result = decode_body::<Event>(&Bytes::from_static(b"{\"name\":"));
        assert!(matches!(result, Err(ApiError::BadRequest)));

        let result = decode_body::<Event>(&Bytes::from_static(b"[1, 2]"));
        assert!(matches!(result, Err(ApiError::BadRequest)));

        let result = decode_body::<Event>(&Bytes::from_static(
            br#"{"slot":{"start_time":"tomorrow"}}"#,
        ));
        assert!(matches!(result, Err(ApiError::BadRequest)));
    }

    #[test]
    fn test_decode_body_ok() {
        let req: UpdateDetailsRequest =
            decode_body(&Bytes::from_static(br#"{"id":"1","address":"Fake"}"#)).unwrap();
        assert_eq!(req.id, "1");
        assert_eq!(req.address, "Fake");
        assert!(req.name.is_empty());
    }

    #[test]
    fn test_require_id() {
        assert!(matches!(
            require_id(None),
            Err(ApiError::ValidEventIdIsRequired)
        ));
        assert!(matches!(
            require_id(Some(String::new())),
            Err(ApiError::ValidEventIdIsRequired)
        ));
        assert_eq!(require_id(Some("32".to_string())).unwrap(), "32");
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None).unwrap(), 0);
        assert_eq!(parse_limit(Some("")).unwrap(), 0);
        assert_eq!(parse_limit(Some("2")).unwrap(), 2);
        assert_eq!(parse_limit(Some("-3")).unwrap(), -3);
        assert!(matches!(parse_limit(Some("two")), Err(ApiError::InvalidLimit)));
        assert!(matches!(parse_limit(Some("2.5")), Err(ApiError::InvalidLimit)));
    }

    #[test]
    fn test_check_slot() {
        assert!(matches!(
            check_slot(None),
            Err(ApiError::EventTimingIsRequired)
        ));
        assert!(matches!(
            check_slot(Some(&TimeSlot::default())),
            Err(ApiError::InvalidTimeFormat)
        ));

        let start = Utc::now();
        let half = TimeSlot {
            start_time: Some(start),
            end_time: None,
        };
        assert!(matches!(
            check_slot(Some(&half)),
            Err(ApiError::InvalidTimeFormat)
        ));
        assert!(check_slot(Some(&TimeSlot::new(start, start + Duration::hours(1)))).is_ok());
    }
}
