// huginn-service/src/routes/grant_routes.rs
use crate::models::{CreateGrantRequest, NotificationType, ResourceType, ServiceError};
use crate::services::{AccessGrantStore, NotificationDispatcher};
use crate::utils::get_user_id_from_request;
use actix_web::{get, post, put, web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::{info, warn};
use serde_json::json;

// Grant a principal access to a survey or collector
#[post("/grants")]
async fn create_grant(
    req: HttpRequest,
    store: web::Data<AccessGrantStore>,
    notifications: web::Data<NotificationDispatcher>,
    data: web::Json<CreateGrantRequest>,
) -> Result<HttpResponse, ServiceError> {
    let granted_by = get_user_id_from_request(&req)?;

    info!(
        "Granting {} access on {} {} to user {}",
        data.access_type, data.resource_type, data.resource_id, data.user_id
    );

    let grant = store.grant(
        data.resource_type,
        &data.resource_id,
        &data.user_id,
        data.access_type,
        &granted_by,
        data.expires_at,
        data.notes.clone(),
    )?;

    // Tell the grantee their survey access arrived; non-critical
    if grant.resource_type == ResourceType::Survey {
        if let Err(e) = notifications.dispatch(
            &grant.user_id,
            NotificationType::SurveyShared,
            "A survey has been shared with you",
            Some(format!(
                "User {} shared survey {} with you",
                granted_by, grant.resource_id
            )),
            Some(("survey", &grant.resource_id)),
            Some(json!({ "survey_id": grant.resource_id })),
        ) {
            warn!("Failed to create survey-shared notification: {}", e);
        }
    }

    Ok(HttpResponse::Created().json(grant))
}

// Revoke a grant (soft; the record stays for audit)
#[put("/grants/{grant_id}/revoke")]
async fn revoke_grant(
    req: HttpRequest,
    store: web::Data<AccessGrantStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let grant_id = path.into_inner();

    let grant = store.revoke(&grant_id, &user_id)?;

    Ok(HttpResponse::Ok().json(grant))
}

// List all grants ever issued on a resource
#[get("/{resource_type}/{resource_id}/grants")]
async fn list_grants(
    req: HttpRequest,
    store: web::Data<AccessGrantStore>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ServiceError> {
    let _user_id = get_user_id_from_request(&req)?;
    let (resource_type, resource_id) = path.into_inner();
    let resource_type = ResourceType::parse(&resource_type)?;

    let grants = store.list(resource_type, &resource_id)?;

    Ok(HttpResponse::Ok().json(grants))
}

// The caller's active access level on a resource
#[get("/{resource_type}/{resource_id}/access")]
async fn check_access(
    req: HttpRequest,
    store: web::Data<AccessGrantStore>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let (resource_type, resource_id) = path.into_inner();
    let resource_type = ResourceType::parse(&resource_type)?;

    let access = store.check(resource_type, &resource_id, &user_id)?;

    Ok(HttpResponse::Ok().json(json!({
        "resource_type": resource_type,
        "resource_id": resource_id,
        "access_type": access,
    })))
}

// Sweep grants past their expiry
//TODO: restrict to admin users once the roles lookup is wired in
#[post("/admin/grants/expire")]
async fn expire_grants(
    req: HttpRequest,
    store: web::Data<AccessGrantStore>,
) -> Result<HttpResponse, ServiceError> {
    let _user_id = get_user_id_from_request(&req)?;

    let count = store.deactivate_expired(Utc::now())?;

    Ok(HttpResponse::Ok().json(json!({ "deactivated": count })))
}

// Register all grant routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_grant)
        .service(revoke_grant)
        .service(expire_grants)
        .service(list_grants)
        .service(check_access);
}
