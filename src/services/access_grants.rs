// huginn-service/src/services/access_grants.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::info;

use crate::models::{AccessGrant, AccessType, ResourceType, ServiceError};
use crate::storage::Storage;

// Grants of a principal's access to a survey or collector. Invariant: at
// most one active, unexpired grant per (resource_type, resource_id,
// user_id), enforced by running the duplicate check and the insert under
// the grants lock.
#[derive(Clone)]
pub struct AccessGrantStore {
    storage: Arc<Storage>,
}

impl AccessGrantStore {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    // Create a grant; fails if the principal already holds an active,
    // unexpired grant on the resource. A grant after revocation is a
    // fresh record, never an update of the revoked one.
    pub fn grant(
        &self,
        resource_type: ResourceType,
        resource_id: &str,
        user_id: &str,
        access_type: AccessType,
        granted_by: &str,
        expires_at: Option<DateTime<Utc>>,
        notes: Option<String>,
    ) -> Result<AccessGrant, ServiceError> {
        let mut records = self.storage.grants.lock()?;
        let now = Utc::now();

        let duplicate = records.values().any(|g| {
            g.is_active
                && !g.is_expired(now)
                && g.resource_type == resource_type
                && g.resource_id == resource_id
                && g.user_id == user_id
        });
        if duplicate {
            return Err(ServiceError::Conflict(format!(
                "User {} already has an active grant on {} {}",
                user_id, resource_type, resource_id
            )));
        }

        let grant = AccessGrant::new(
            resource_type,
            resource_id.to_string(),
            user_id.to_string(),
            access_type,
            granted_by.to_string(),
            expires_at,
            notes,
        );

        self.storage.grants.persist(&grant.id, &grant)?;
        records.insert(grant.id.clone(), grant.clone());

        info!(
            "✅ Granted {} access on {} {} to user {}",
            access_type, resource_type, resource_id, user_id
        );

        Ok(grant)
    }

    // Soft-revoke; the record stays around for audit
    pub fn revoke(&self, grant_id: &str, by: &str) -> Result<AccessGrant, ServiceError> {
        let mut records = self.storage.grants.lock()?;

        let grant = records.get_mut(grant_id).ok_or(ServiceError::NotFound)?;

        if !grant.is_active {
            return Err(ServiceError::AlreadyRevoked);
        }

        grant.is_active = false;
        grant.revoked_at = Some(Utc::now());
        grant.revoked_by = Some(by.to_string());

        let updated = grant.clone();
        self.storage.grants.persist(&updated.id, &updated)?;

        info!("Revoked grant {} by user {}", grant_id, by);

        Ok(updated)
    }

    // The principal's active access level at time of call. An expired
    // grant reads as absent regardless of its is_active flag; it is not
    // deactivated here (deactivate_expired does that).
    pub fn check(
        &self,
        resource_type: ResourceType,
        resource_id: &str,
        user_id: &str,
    ) -> Result<Option<AccessType>, ServiceError> {
        let records = self.storage.grants.lock()?;
        let now = Utc::now();

        Ok(records
            .values()
            .find(|g| {
                g.is_active
                    && !g.is_expired(now)
                    && g.resource_type == resource_type
                    && g.resource_id == resource_id
                    && g.user_id == user_id
            })
            .map(|g| g.access_type))
    }

    // All grants ever issued on a resource, newest first
    pub fn list(
        &self,
        resource_type: ResourceType,
        resource_id: &str,
    ) -> Result<Vec<AccessGrant>, ServiceError> {
        let records = self.storage.grants.lock()?;

        let mut grants: Vec<AccessGrant> = records
            .values()
            .filter(|g| g.resource_type == resource_type && g.resource_id == resource_id)
            .cloned()
            .collect();

        grants.sort_by(|a, b| b.granted_at.cmp(&a.granted_at));

        Ok(grants)
    }

    // Sweep counterpart to check(): deactivate grants past their expiry.
    // Safe to call repeatedly.
    pub fn deactivate_expired(&self, now: DateTime<Utc>) -> Result<usize, ServiceError> {
        let mut records = self.storage.grants.lock()?;
        let mut count = 0;

        for grant in records.values_mut() {
            if grant.is_active && grant.is_expired(now) {
                grant.is_active = false;
                let snapshot = grant.clone();
                self.storage.grants.persist(&snapshot.id, &snapshot)?;
                count += 1;
            }
        }

        if count > 0 {
            info!("Deactivated {} expired grants", count);
        }

        Ok(count)
    }
}
