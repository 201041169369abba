// huginn-service/src/models/access_grant.rs
use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::models::ServiceError;

// Resource families a grant can attach to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum ResourceType {
    #[serde(rename = "survey")]
    #[display(fmt = "survey")]
    Survey,
    #[serde(rename = "collector")]
    #[display(fmt = "collector")]
    Collector,
}

impl ResourceType {
    // Parse a URL path segment (singular or plural) into a resource type
    pub fn parse(value: &str) -> Result<Self, ServiceError> {
        match value {
            "survey" | "surveys" => Ok(ResourceType::Survey),
            "collector" | "collectors" => Ok(ResourceType::Collector),
            other => Err(ServiceError::BadRequest(format!(
                "Unknown resource type: {}",
                other
            ))),
        }
    }
}

// Access levels a principal can hold on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum AccessType {
    #[serde(rename = "full")]
    #[display(fmt = "full")]
    Full,
    #[serde(rename = "view")]
    #[display(fmt = "view")]
    View,
    #[serde(rename = "respond")]
    #[display(fmt = "respond")]
    Respond,
    #[serde(rename = "owner")]
    #[display(fmt = "owner")]
    Owner,
    #[serde(rename = "editor")]
    #[display(fmt = "editor")]
    Editor,
    #[serde(rename = "viewer")]
    #[display(fmt = "viewer")]
    Viewer,
}

// A persisted authorization of a principal on a survey or collector.
// Revocation is soft: the record stays around with revoked_at/revoked_by
// so the grant history survives for audit.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AccessGrant {
    pub id: String,
    pub resource_type: ResourceType,
    pub resource_id: String,
    pub user_id: String,
    pub access_type: AccessType,
    pub granted_by: String,
    pub granted_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub revoked_at: Option<DateTime<Utc>>,
    pub revoked_by: Option<String>,
    pub notes: Option<String>,
}

impl AccessGrant {
    // Create a new active grant with default values
    pub fn new(
        resource_type: ResourceType,
        resource_id: String,
        user_id: String,
        access_type: AccessType,
        granted_by: String,
        expires_at: Option<DateTime<Utc>>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            resource_type,
            resource_id,
            user_id,
            access_type,
            granted_by,
            granted_at: Utc::now(),
            expires_at,
            is_active: true,
            revoked_at: None,
            revoked_by: None,
            notes,
        }
    }

    // Expired at the given instant (no expiry = never expires)
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(false, |t| now > t)
    }
}

// Request to create a new grant
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateGrantRequest {
    pub resource_type: ResourceType,
    pub resource_id: String,
    pub user_id: String,
    pub access_type: AccessType,
    pub expires_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}
