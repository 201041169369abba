// huginn-service/src/routes/notification_routes.rs
use crate::models::ServiceError;
use crate::services::NotificationDispatcher;
use crate::utils::get_user_id_from_request;
use actix_web::{delete, get, put, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
struct UnreadQuery {
    limit: Option<usize>,
}

#[derive(Deserialize)]
struct ListQuery {
    limit: Option<usize>,
    offset: Option<usize>,
}

// Unread notifications for the current user, newest first
#[get("/notifications/unread")]
async fn get_unread(
    req: HttpRequest,
    dispatcher: web::Data<NotificationDispatcher>,
    query: web::Query<UnreadQuery>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;

    let notifications = dispatcher.list_unread(&user_id, query.limit.unwrap_or(20))?;
    let unread = dispatcher.unread_count(&user_id)?;

    Ok(HttpResponse::Ok().json(json!({
        "notifications": notifications,
        "unread_count": unread,
    })))
}

// Paginated listing of all notifications for the current user
#[get("/notifications")]
async fn get_notifications(
    req: HttpRequest,
    dispatcher: web::Data<NotificationDispatcher>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;

    let (notifications, total) = dispatcher.list(
        &user_id,
        query.limit.unwrap_or(50),
        query.offset.unwrap_or(0),
    )?;

    Ok(HttpResponse::Ok().json(json!({
        "notifications": notifications,
        "total": total,
    })))
}

// Mark every unread notification of the current user read
#[put("/notifications/read-all")]
async fn mark_all_read(
    req: HttpRequest,
    dispatcher: web::Data<NotificationDispatcher>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;

    let updated = dispatcher.mark_all_read(&user_id)?;

    Ok(HttpResponse::Ok().json(json!({ "updated": updated })))
}

// Mark a single notification read (idempotent)
#[put("/notifications/{notification_id}/read")]
async fn mark_read(
    req: HttpRequest,
    dispatcher: web::Data<NotificationDispatcher>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let notification_id = path.into_inner();

    let notification = dispatcher.mark_read(&notification_id, &user_id)?;

    Ok(HttpResponse::Ok().json(notification))
}

// Delete a notification the current user owns
#[delete("/notifications/{notification_id}")]
async fn delete_notification(
    req: HttpRequest,
    dispatcher: web::Data<NotificationDispatcher>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let notification_id = path.into_inner();

    dispatcher.delete(&notification_id, &user_id)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Notification deleted successfully"
    })))
}

// Register all notification routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_unread)
        .service(get_notifications)
        .service(mark_all_read)
        .service(mark_read)
        .service(delete_notification);
}
