// huginn-service/src/routes/invitation_routes.rs
use crate::models::{CreateInvitationRequest, ServiceError};
use crate::services::InvitationWorkflow;
use crate::utils::get_user_id_from_request;
use actix_web::{post, web, HttpRequest, HttpResponse};
use chrono::{Duration, Utc};
use log::info;
use serde_json::json;

// Invite a user to a collector
#[post("/collectors/{collector_id}/invitations")]
async fn create_invitation(
    req: HttpRequest,
    workflow: web::Data<InvitationWorkflow>,
    path: web::Path<String>,
    data: web::Json<CreateInvitationRequest>,
) -> Result<HttpResponse, ServiceError> {
    let invited_by = get_user_id_from_request(&req)?;
    let collector_id = path.into_inner();

    let ttl_days = data.ttl_days.unwrap_or(7);
    if ttl_days < 1 {
        return Err(ServiceError::BadRequest(
            "ttl_days must be at least 1".to_string(),
        ));
    }

    info!(
        "📧 Creating invitation to collector: {} for user: {}",
        collector_id, data.user_id
    );

    let invitation = workflow.invite(
        &collector_id,
        &data.user_id,
        &invited_by,
        Duration::days(ttl_days),
    )?;

    Ok(HttpResponse::Created().json(invitation))
}

// Redeem an invitation token. Possession of the unguessable token is the
// authorization; the caller only has to be signed in.
#[post("/invitations/{token}/accept")]
async fn accept_invitation(
    req: HttpRequest,
    workflow: web::Data<InvitationWorkflow>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let _user_id = get_user_id_from_request(&req)?;
    let token = path.into_inner();

    let invitation = workflow.accept(&token)?;

    Ok(HttpResponse::Ok().json(json!({
        "id": invitation.id,
        "status": invitation.status,
        "collector_id": invitation.collector_id,
        "message": "Invitation accepted successfully",
    })))
}

// Decline an invitation
#[post("/invitations/{token}/reject")]
async fn reject_invitation(
    req: HttpRequest,
    workflow: web::Data<InvitationWorkflow>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let _user_id = get_user_id_from_request(&req)?;
    let token = path.into_inner();

    let invitation = workflow.reject(&token)?;

    Ok(HttpResponse::Ok().json(json!({
        "id": invitation.id,
        "status": invitation.status,
        "message": "Invitation declined",
    })))
}

// Sweep pending invitations past their expiry
//TODO: restrict to admin users once the roles lookup is wired in
#[post("/admin/invitations/expire")]
async fn expire_invitations(
    req: HttpRequest,
    workflow: web::Data<InvitationWorkflow>,
) -> Result<HttpResponse, ServiceError> {
    let _user_id = get_user_id_from_request(&req)?;

    let count = workflow.expire_stale(Utc::now())?;

    Ok(HttpResponse::Ok().json(json!({ "expired": count })))
}

// Register all invitation routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_invitation)
        .service(accept_invitation)
        .service(reject_invitation)
        .service(expire_invitations);
}
