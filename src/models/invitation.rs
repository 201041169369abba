// huginn-service/src/models/invitation.rs
use chrono::{DateTime, Duration, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::utils::token;

// Status for collector invitations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum InvitationStatus {
    #[serde(rename = "pending")]
    #[display(fmt = "pending")]
    Pending,
    #[serde(rename = "accepted")]
    #[display(fmt = "accepted")]
    Accepted,
    #[serde(rename = "rejected")]
    #[display(fmt = "rejected")]
    Rejected,
    #[serde(rename = "expired")]
    #[display(fmt = "expired")]
    Expired,
}

// Collector membership invitation, redeemable once via its token.
// Pending is the only state with outgoing transitions.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Invitation {
    pub id: String,
    pub collector_id: String,
    pub user_id: String,
    pub invite_token: String,
    pub status: InvitationStatus,
    pub invited_by: String,
    pub invited_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
}

impl Invitation {
    // Create a new pending invitation expiring after the given ttl
    pub fn new(collector_id: String, user_id: String, invited_by: String, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            collector_id,
            user_id,
            invite_token: token::generate(),
            status: InvitationStatus::Pending,
            invited_by,
            invited_at: now,
            accepted_at: None,
            expires_at: now + ttl,
        }
    }

    // Check if invitation is expired at the given instant
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

// Request to invite a user to a collector
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateInvitationRequest {
    pub user_id: String,
    pub ttl_days: Option<i64>,
}
