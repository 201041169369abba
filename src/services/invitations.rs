// huginn-service/src/services/invitations.rs
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use serde_json::json;

use crate::models::{
    AccessType, Invitation, InvitationStatus, NotificationType, ResourceType, ServiceError,
};
use crate::services::{AccessGrantStore, NotificationDispatcher};
use crate::storage::Storage;

// Single-use invitations for collector membership. State machine:
// pending -> accepted | rejected | expired; terminal states never
// transition again. Accepting creates the membership grant and notifies
// the inviter.
#[derive(Clone)]
pub struct InvitationWorkflow {
    storage: Arc<Storage>,
    grants: AccessGrantStore,
    notifications: NotificationDispatcher,
}

impl InvitationWorkflow {
    pub fn new(
        storage: Arc<Storage>,
        grants: AccessGrantStore,
        notifications: NotificationDispatcher,
    ) -> Self {
        Self {
            storage,
            grants,
            notifications,
        }
    }

    // Invite a user to a collector. Fails if a pending invitation for the
    // pair already exists. The invitee is notified with the redeem token.
    pub fn invite(
        &self,
        collector_id: &str,
        user_id: &str,
        invited_by: &str,
        ttl: Duration,
    ) -> Result<Invitation, ServiceError> {
        let mut records = self.storage.invitations.lock()?;

        let pending_exists = records.values().any(|i| {
            i.collector_id == collector_id
                && i.user_id == user_id
                && i.status == InvitationStatus::Pending
        });
        if pending_exists {
            return Err(ServiceError::DuplicateInvitation);
        }

        let invitation = Invitation::new(
            collector_id.to_string(),
            user_id.to_string(),
            invited_by.to_string(),
            ttl,
        );

        self.storage.invitations.persist(&invitation.id, &invitation)?;
        records.insert(invitation.id.clone(), invitation.clone());
        drop(records);

        info!("📧 Invited user {} to collector {}", user_id, collector_id);

        // Notification failures never fail the invite
        if let Err(e) = self.notifications.dispatch(
            user_id,
            NotificationType::WorkspaceInvitation,
            "You have been invited to join a collector",
            Some(format!(
                "User {} invited you to collector {}",
                invited_by, collector_id
            )),
            Some(("collector", collector_id)),
            Some(json!({ "token": invitation.invite_token })),
        ) {
            warn!("Failed to create invitation notification: {}", e);
        }

        Ok(invitation)
    }

    // Redeem an invitation token. An expired pending invitation is marked
    // expired before the error is returned, so the expiry is observable
    // afterwards; any other non-pending state is an invalid transition.
    pub fn accept(&self, token: &str) -> Result<Invitation, ServiceError> {
        let now = Utc::now();
        let accepted = {
            let mut records = self.storage.invitations.lock()?;

            let invitation = records
                .values_mut()
                .find(|i| i.invite_token == token)
                .ok_or(ServiceError::NotFound)?;

            if invitation.status == InvitationStatus::Pending && invitation.is_expired(now) {
                invitation.status = InvitationStatus::Expired;
                let snapshot = invitation.clone();
                self.storage.invitations.persist(&snapshot.id, &snapshot)?;
                return Err(ServiceError::Expired);
            }

            if invitation.status != InvitationStatus::Pending {
                return Err(ServiceError::InvalidState(format!(
                    "Invitation is already {}",
                    invitation.status
                )));
            }

            invitation.status = InvitationStatus::Accepted;
            invitation.accepted_at = Some(now);

            let accepted = invitation.clone();
            self.storage.invitations.persist(&accepted.id, &accepted)?;
            accepted
        };

        // Membership grant; an existing active grant is not an error here
        match self.grants.grant(
            ResourceType::Collector,
            &accepted.collector_id,
            &accepted.user_id,
            AccessType::Full,
            &accepted.invited_by,
            None,
            None,
        ) {
            Ok(_) => {}
            Err(ServiceError::Conflict(_)) => {
                info!(
                    "User {} already holds a grant on collector {}",
                    accepted.user_id, accepted.collector_id
                );
            }
            Err(e) => return Err(e),
        }

        // Tell the inviter; non-critical
        if let Err(e) = self.notifications.dispatch(
            &accepted.invited_by,
            NotificationType::WorkspaceMemberAdded,
            "Invitation accepted",
            Some(format!(
                "User {} joined collector {}",
                accepted.user_id, accepted.collector_id
            )),
            Some(("collector", &accepted.collector_id)),
            Some(json!({ "member_id": accepted.user_id })),
        ) {
            warn!("Failed to create member-added notification: {}", e);
        }

        info!(
            "✅ Invitation {} accepted by user {}",
            accepted.id, accepted.user_id
        );

        Ok(accepted)
    }

    // Decline an invitation. Same preconditions as accept; no grant and
    // no notification are created.
    pub fn reject(&self, token: &str) -> Result<Invitation, ServiceError> {
        let now = Utc::now();
        let mut records = self.storage.invitations.lock()?;

        let invitation = records
            .values_mut()
            .find(|i| i.invite_token == token)
            .ok_or(ServiceError::NotFound)?;

        if invitation.status == InvitationStatus::Pending && invitation.is_expired(now) {
            invitation.status = InvitationStatus::Expired;
            let snapshot = invitation.clone();
            self.storage.invitations.persist(&snapshot.id, &snapshot)?;
            return Err(ServiceError::Expired);
        }

        if invitation.status != InvitationStatus::Pending {
            return Err(ServiceError::InvalidState(format!(
                "Invitation is already {}",
                invitation.status
            )));
        }

        invitation.status = InvitationStatus::Rejected;

        let rejected = invitation.clone();
        self.storage.invitations.persist(&rejected.id, &rejected)?;

        info!(
            "Invitation {} rejected by user {}",
            rejected.id, rejected.user_id
        );

        Ok(rejected)
    }

    // Transition every pending invitation past its expiry to expired.
    // Idempotent: a second sweep with the same instant finds nothing.
    pub fn expire_stale(&self, now: DateTime<Utc>) -> Result<usize, ServiceError> {
        let mut records = self.storage.invitations.lock()?;
        let mut count = 0;

        for invitation in records.values_mut() {
            if invitation.status == InvitationStatus::Pending && invitation.expires_at < now {
                invitation.status = InvitationStatus::Expired;

                let snapshot = invitation.clone();
                self.storage.invitations.persist(&snapshot.id, &snapshot)?;
                count += 1;
            }
        }

        if count > 0 {
            info!("Expired {} stale invitations", count);
        }

        Ok(count)
    }
}
