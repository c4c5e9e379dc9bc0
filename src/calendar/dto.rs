use serde::Deserialize;
use time::OffsetDateTime;

use super::repo_types::{EventStatus, EventType};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub start_date: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end_date: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub reminder_date: Option<OffsetDateTime>,
    #[serde(rename = "type", default = "default_type")]
    pub event_type: EventType,
    #[serde(default = "default_status")]
    pub status: EventStatus,
    #[serde(default)]
    pub is_recurring: bool,
    pub recurrence_pattern: Option<String>,
    pub tags: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_all_day: bool,
    pub color: Option<String>,
    pub location: Option<String>,
}

fn default_type() -> EventType {
    EventType::Task
}
fn default_status() -> EventStatus {
    EventStatus::Pending
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start_date: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end_date: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub reminder_date: Option<OffsetDateTime>,
    #[serde(rename = "type")]
    pub event_type: Option<EventType>,
    pub status: Option<EventStatus>,
    pub is_recurring: Option<bool>,
    pub recurrence_pattern: Option<String>,
    pub tags: Option<String>,
    pub is_favorite: Option<bool>,
    pub is_all_day: Option<bool>,
    pub color: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    #[serde(with = "time::serde::rfc3339")]
    pub start_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_date: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    #[serde(default = "default_days")]
    pub days: i64,
}

fn default_days() -> i64 {
    7
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_event_defaults() {
        let req: CreateEventRequest = serde_json::from_str(
            r#"{"title":"Dentist","startDate":"2026-09-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(req.event_type, EventType::Task);
        assert_eq!(req.status, EventStatus::Pending);
        assert!(!req.is_recurring);
        assert!(!req.is_all_day);
        assert!(req.end_date.is_none());
    }

    #[test]
    fn event_type_uses_snake_case_wire_names() {
        let req: CreateEventRequest = serde_json::from_str(
            r#"{"title":"Bday","startDate":"2026-09-01T00:00:00Z","type":"birthday","isAllDay":true}"#,
        )
        .unwrap();
        assert_eq!(req.event_type, EventType::Birthday);
        assert!(req.is_all_day);
    }
}
