// huginn-service/src/services/notifications.rs
use std::sync::Arc;

use chrono::Utc;
use log::info;
use serde_json::Value;

use crate::models::{Notification, NotificationType, ServiceError};
use crate::storage::Storage;

// Hard cap on page sizes regardless of what the caller asks for
const MAX_PAGE_SIZE: usize = 100;

// Records workflow events as per-user notifications. Delivery to email or
// push channels is someone else's job; this component only persists and
// tracks read state.
#[derive(Clone)]
pub struct NotificationDispatcher {
    storage: Arc<Storage>,
}

impl NotificationDispatcher {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    // Persist a workflow event. The data payload must carry the keys the
    // type requires; beyond that it is stored verbatim.
    pub fn dispatch(
        &self,
        user_id: &str,
        kind: NotificationType,
        title: &str,
        message: Option<String>,
        related: Option<(&str, &str)>,
        data: Option<Value>,
    ) -> Result<Notification, ServiceError> {
        Self::validate_payload(kind, data.as_ref())?;

        let notification = Notification::new(
            user_id.to_string(),
            kind,
            title.to_string(),
            message,
            related,
            data,
        );

        let mut records = self.storage.notifications.lock()?;
        self.storage
            .notifications
            .persist(&notification.id, &notification)?;
        records.insert(notification.id.clone(), notification.clone());

        info!("Created {} notification for user {}", kind, user_id);

        Ok(notification)
    }

    fn validate_payload(kind: NotificationType, data: Option<&Value>) -> Result<(), ServiceError> {
        let required = kind.required_data_keys();
        if required.is_empty() {
            return Ok(());
        }

        let payload = data.ok_or_else(|| {
            ServiceError::InvalidPayload(format!("{} notifications require a data payload", kind))
        })?;

        let object = payload.as_object().ok_or_else(|| {
            ServiceError::InvalidPayload(format!("{} data payload must be a JSON object", kind))
        })?;

        for key in required {
            if !object.contains_key(*key) {
                return Err(ServiceError::InvalidPayload(format!(
                    "{} data payload is missing required key '{}'",
                    kind, key
                )));
            }
        }

        Ok(())
    }

    // Mark a notification read. Idempotent: marking an already-read
    // notification returns its current state.
    pub fn mark_read(
        &self,
        notification_id: &str,
        user_id: &str,
    ) -> Result<Notification, ServiceError> {
        let mut records = self.storage.notifications.lock()?;

        let notification = records
            .get_mut(notification_id)
            .ok_or(ServiceError::NotFound)?;

        if notification.user_id != user_id {
            return Err(ServiceError::Forbidden);
        }

        if notification.is_read {
            return Ok(notification.clone());
        }

        notification.is_read = true;
        notification.read_at = Some(Utc::now());

        let updated = notification.clone();
        self.storage.notifications.persist(&updated.id, &updated)?;

        Ok(updated)
    }

    // Mark every unread notification of a user read; returns how many
    pub fn mark_all_read(&self, user_id: &str) -> Result<usize, ServiceError> {
        let mut records = self.storage.notifications.lock()?;
        let now = Utc::now();
        let mut count = 0;

        for notification in records.values_mut() {
            if notification.user_id == user_id && !notification.is_read {
                notification.is_read = true;
                notification.read_at = Some(now);

                let snapshot = notification.clone();
                self.storage.notifications.persist(&snapshot.id, &snapshot)?;
                count += 1;
            }
        }

        Ok(count)
    }

    // Unread notifications, newest first
    pub fn list_unread(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Notification>, ServiceError> {
        let records = self.storage.notifications.lock()?;

        let mut items: Vec<Notification> = records
            .values()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .cloned()
            .collect();

        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items.truncate(limit.min(MAX_PAGE_SIZE));

        Ok(items)
    }

    // Paginated listing of all notifications, newest first, with the
    // total count before pagination
    pub fn list(
        &self,
        user_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<Notification>, usize), ServiceError> {
        let records = self.storage.notifications.lock()?;

        let mut items: Vec<Notification> = records
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();

        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = items.len();
        let page = items
            .into_iter()
            .skip(offset)
            .take(limit.min(MAX_PAGE_SIZE))
            .collect();

        Ok((page, total))
    }

    pub fn unread_count(&self, user_id: &str) -> Result<usize, ServiceError> {
        let records = self.storage.notifications.lock()?;

        Ok(records
            .values()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .count())
    }

    // Delete a notification the user owns
    pub fn delete(&self, notification_id: &str, user_id: &str) -> Result<(), ServiceError> {
        let mut records = self.storage.notifications.lock()?;

        let notification = records.get(notification_id).ok_or(ServiceError::NotFound)?;
        if notification.user_id != user_id {
            return Err(ServiceError::Forbidden);
        }

        records.remove(notification_id);
        self.storage.notifications.remove_file(notification_id)?;

        info!("🗑️ Deleted notification {}", notification_id);

        Ok(())
    }
}
