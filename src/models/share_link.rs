// huginn-service/src/models/share_link.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::token;

// Tokenized public entry point to a survey, optionally bounded by an
// expiry date and a response quota. access_count only moves through
// LinkAccessController::record_response, which also flips is_active off
// once the quota is reached.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ShareLink {
    pub id: String,
    pub survey_id: String,
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_by: String,
    pub access_count: u32,
    pub max_responses: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl ShareLink {
    // Create a new active link with a fresh token and a zeroed counter
    pub fn new(
        survey_id: String,
        created_by: String,
        expires_at: Option<DateTime<Utc>>,
        max_responses: Option<u32>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            survey_id,
            token: token::generate(),
            expires_at,
            is_active: true,
            created_by,
            access_count: 0,
            max_responses,
            created_at: Utc::now(),
        }
    }

    // Expired at the given instant (no expiry = never expires)
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(false, |t| now > t)
    }

    // Quota reached (no quota = unlimited)
    pub fn is_exhausted(&self) -> bool {
        self.max_responses.map_or(false, |max| self.access_count >= max)
    }
}

// Request to create a new share link
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateLinkRequest {
    pub expires_at: Option<DateTime<Utc>>,
    pub max_responses: Option<u32>,
}
