use serde::Deserialize;
use time::OffsetDateTime;

use super::repo_types::{NotificationPriority, NotificationStatus, NotificationType};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    pub title: String,
    pub message: Option<String>,
    #[serde(rename = "type", default = "default_type")]
    pub notification_type: NotificationType,
    #[serde(default = "default_status")]
    pub status: NotificationStatus,
    #[serde(default = "default_priority")]
    pub priority: NotificationPriority,
    #[serde(with = "time::serde::rfc3339")]
    pub scheduled_for: OffsetDateTime,
    pub related_module: Option<String>,
    pub related_id: Option<i64>,
}

fn default_type() -> NotificationType {
    NotificationType::InApp
}
fn default_status() -> NotificationStatus {
    NotificationStatus::Pending
}
fn default_priority() -> NotificationPriority {
    NotificationPriority::Normal
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotificationRequest {
    pub title: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub notification_type: Option<NotificationType>,
    pub status: Option<NotificationStatus>,
    pub priority: Option<NotificationPriority>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub scheduled_for: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    #[serde(default = "default_hours")]
    pub hours: i64,
}

fn default_hours() -> i64 {
    24
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_defaults_to_pending_in_app_normal() {
        let req: CreateNotificationRequest = serde_json::from_str(
            r#"{"title":"Water the plants","scheduledFor":"2026-09-01T08:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(req.notification_type, NotificationType::InApp);
        assert_eq!(req.status, NotificationStatus::Pending);
        assert_eq!(req.priority, NotificationPriority::Normal);
    }

    #[test]
    fn in_app_wire_name_is_snake_case() {
        let req: CreateNotificationRequest = serde_json::from_str(
            r#"{"title":"t","type":"in_app","priority":"urgent","scheduledFor":"2026-09-01T08:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(req.notification_type, NotificationType::InApp);
        assert_eq!(req.priority, NotificationPriority::Urgent);
    }
}
