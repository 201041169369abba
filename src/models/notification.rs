// huginn-service/src/models/notification.rs
use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

// Workflow events a notification can describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum NotificationType {
    #[serde(rename = "workspace_invitation")]
    #[display(fmt = "workspace_invitation")]
    WorkspaceInvitation,
    #[serde(rename = "workspace_member_added")]
    #[display(fmt = "workspace_member_added")]
    WorkspaceMemberAdded,
    #[serde(rename = "survey_invitation")]
    #[display(fmt = "survey_invitation")]
    SurveyInvitation,
    #[serde(rename = "survey_shared")]
    #[display(fmt = "survey_shared")]
    SurveyShared,
    #[serde(rename = "collector_created")]
    #[display(fmt = "collector_created")]
    CollectorCreated,
    #[serde(rename = "response_completed")]
    #[display(fmt = "response_completed")]
    ResponseCompleted,
}

impl NotificationType {
    // Keys the data payload must carry for this type. The payload itself
    // is stored verbatim; only the presence of these keys is enforced.
    pub fn required_data_keys(&self) -> &'static [&'static str] {
        match self {
            NotificationType::WorkspaceInvitation => &["token"],
            NotificationType::WorkspaceMemberAdded => &["member_id"],
            NotificationType::SurveyInvitation => &["invite_token"],
            NotificationType::SurveyShared => &["survey_id"],
            NotificationType::CollectorCreated => &["collector_id"],
            NotificationType::ResponseCompleted => &["survey_id"],
        }
    }
}

// A persisted workflow event for a single user. Only the read flag and
// read_at ever change after creation.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    pub message: Option<String>,
    pub related_type: Option<String>,
    pub related_id: Option<String>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub data: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    // Create a new unread notification
    pub fn new(
        user_id: String,
        kind: NotificationType,
        title: String,
        message: Option<String>,
        related: Option<(&str, &str)>,
        data: Option<serde_json::Value>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            kind,
            title,
            message,
            related_type: related.map(|(t, _)| t.to_string()),
            related_id: related.map(|(_, id)| id.to_string()),
            is_read: false,
            read_at: None,
            data,
            created_at: Utc::now(),
        }
    }
}
