// huginn-service/src/services/share_links.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde_json::json;

use crate::models::{NotificationType, ServiceError, ShareLink};
use crate::services::NotificationDispatcher;
use crate::storage::Storage;

// Shareable survey links. Resolution is read-only; consuming a response
// slot goes through record_response, where the quota check, the increment
// and the at-quota deactivation form one atomic unit under the links
// lock. Two concurrent submissions can therefore never both take the
// last slot.
#[derive(Clone)]
pub struct LinkAccessController {
    storage: Arc<Storage>,
    notifications: NotificationDispatcher,
}

impl LinkAccessController {
    pub fn new(storage: Arc<Storage>, notifications: NotificationDispatcher) -> Self {
        Self {
            storage,
            notifications,
        }
    }

    pub fn create_link(
        &self,
        survey_id: &str,
        created_by: &str,
        expires_at: Option<DateTime<Utc>>,
        max_responses: Option<u32>,
    ) -> Result<ShareLink, ServiceError> {
        if max_responses == Some(0) {
            return Err(ServiceError::BadRequest(
                "max_responses must be at least 1".to_string(),
            ));
        }

        let link = ShareLink::new(
            survey_id.to_string(),
            created_by.to_string(),
            expires_at,
            max_responses,
        );

        let mut records = self.storage.links.lock()?;
        self.storage.links.persist(&link.id, &link)?;
        records.insert(link.id.clone(), link.clone());

        info!("🔗 Created share link {} for survey {}", link.id, survey_id);

        Ok(link)
    }

    // Validation order matters: expiry dominates the active flag, and an
    // exhausted link reports its quota rather than the inactive flag the
    // exhaustion also set.
    fn validate(link: &ShareLink, now: DateTime<Utc>) -> Result<(), ServiceError> {
        if link.is_expired(now) {
            return Err(ServiceError::Expired);
        }
        if link.is_exhausted() {
            return Err(ServiceError::QuotaExceeded);
        }
        if !link.is_active {
            return Err(ServiceError::Inactive);
        }
        Ok(())
    }

    // Resolve a link visit so the survey can be rendered. Never consumes
    // a response slot.
    pub fn resolve_visit(&self, token: &str) -> Result<ShareLink, ServiceError> {
        let records = self.storage.links.lock()?;

        let link = records
            .values()
            .find(|l| l.token == token)
            .ok_or(ServiceError::NotFound)?;

        Self::validate(link, Utc::now())?;

        Ok(link.clone())
    }

    // Consume one response slot. Reaching the quota deactivates the link
    // in the same lock scope as the increment.
    pub fn record_response(&self, token: &str) -> Result<ShareLink, ServiceError> {
        let updated = {
            let mut records = self.storage.links.lock()?;

            let link = records
                .values_mut()
                .find(|l| l.token == token)
                .ok_or(ServiceError::NotFound)?;

            Self::validate(link, Utc::now())?;

            link.access_count += 1;
            if link.is_exhausted() {
                link.is_active = false;
            }

            let updated = link.clone();
            self.storage.links.persist(&updated.id, &updated)?;
            updated
        };

        debug!(
            "Recorded response {} on link {}",
            updated.access_count, updated.id
        );

        // Tell the link creator; non-critical
        if let Err(e) = self.notifications.dispatch(
            &updated.created_by,
            NotificationType::ResponseCompleted,
            "New survey response",
            Some(format!(
                "Survey {} received a new response",
                updated.survey_id
            )),
            Some(("survey", &updated.survey_id)),
            Some(json!({ "survey_id": updated.survey_id })),
        ) {
            warn!("Failed to create response notification: {}", e);
        }

        Ok(updated)
    }

    // Deactivate a link. Idempotent: revoking an already-inactive link
    // returns its current state.
    pub fn revoke_link(&self, link_id: &str, by: &str) -> Result<ShareLink, ServiceError> {
        let mut records = self.storage.links.lock()?;

        let link = records.get_mut(link_id).ok_or(ServiceError::NotFound)?;

        if !link.is_active {
            return Ok(link.clone());
        }

        link.is_active = false;

        let updated = link.clone();
        self.storage.links.persist(&updated.id, &updated)?;

        info!("Revoked share link {} by user {}", link_id, by);

        Ok(updated)
    }

    // All links for a survey, newest first
    pub fn list_for_survey(&self, survey_id: &str) -> Result<Vec<ShareLink>, ServiceError> {
        let records = self.storage.links.lock()?;

        let mut links: Vec<ShareLink> = records
            .values()
            .filter(|l| l.survey_id == survey_id)
            .cloned()
            .collect();

        links.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(links)
    }
}
