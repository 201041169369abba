// huginn-service/src/routes/link_routes.rs
use crate::models::{CreateLinkRequest, ServiceError};
use crate::services::LinkAccessController;
use crate::utils::get_user_id_from_request;
use actix_web::{get, post, put, web, HttpRequest, HttpResponse};
use log::info;
use serde_json::json;

// Create a share link for a survey
#[post("/surveys/{survey_id}/links")]
async fn create_link(
    req: HttpRequest,
    links: web::Data<LinkAccessController>,
    path: web::Path<String>,
    data: web::Json<CreateLinkRequest>,
) -> Result<HttpResponse, ServiceError> {
    let created_by = get_user_id_from_request(&req)?;
    let survey_id = path.into_inner();

    let link = links.create_link(&survey_id, &created_by, data.expires_at, data.max_responses)?;

    Ok(HttpResponse::Created().json(link))
}

// List all share links of a survey
#[get("/surveys/{survey_id}/links")]
async fn list_links(
    req: HttpRequest,
    links: web::Data<LinkAccessController>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let _user_id = get_user_id_from_request(&req)?;
    let survey_id = path.into_inner();

    let survey_links = links.list_for_survey(&survey_id)?;

    Ok(HttpResponse::Ok().json(survey_links))
}

// Deactivate a share link
#[put("/links/{link_id}/revoke")]
async fn revoke_link(
    req: HttpRequest,
    links: web::Data<LinkAccessController>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let link_id = path.into_inner();

    info!("Revoking share link: {}", link_id);

    let link = links.revoke_link(&link_id, &user_id)?;

    Ok(HttpResponse::Ok().json(link))
}

// Resolve a link visit so the survey can be rendered. Public: respondents
// are anonymous. Does not consume a response slot.
#[get("/links/{token}")]
async fn resolve_link(
    links: web::Data<LinkAccessController>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let token = path.into_inner();

    let link = links.resolve_visit(&token)?;

    Ok(HttpResponse::Ok().json(json!({ "survey_id": link.survey_id })))
}

// Consume one response slot against the link's quota. Public.
#[post("/links/{token}/responses")]
async fn record_response(
    links: web::Data<LinkAccessController>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let token = path.into_inner();

    links.record_response(&token)?;

    Ok(HttpResponse::Ok().json(json!({ "status": "recorded" })))
}

// Register the authenticated link-management routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_link)
        .service(list_links)
        .service(revoke_link);
}

// Register the public link entry points
pub fn init_public_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(resolve_link).service(record_response);
}
