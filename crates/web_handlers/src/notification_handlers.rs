use actix_web::{HttpResponse, Result, web};
use uuid::Uuid;

use auth_services::middleware::AuthenticatedUser;
use entity_store::EntityStore;
use notification_services::*;

use crate::redirect::see_other;

/// Gets every notification of the authenticated user, newest first
pub async fn list_notifications(
    store: web::Data<dyn EntityStore>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, NotificationError> {
    let reader = NotificationReader::new(store.into_inner());
    let notifications = reader.list_notifications(&user.0).await?;

    Ok(HttpResponse::Ok().json(notifications))
}

/// Gets the unread notifications of the authenticated user, newest first
pub async fn list_unread_notifications(
    store: web::Data<dyn EntityStore>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, NotificationError> {
    let reader = NotificationReader::new(store.into_inner());
    let notifications = reader.list_unread_notifications(&user.0).await?;

    Ok(HttpResponse::Ok().json(notifications))
}

/// Marks one of the authenticated user's notifications as read and redirects to its campground
pub async fn open_notification(
    store: web::Data<dyn EntityStore>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, NotificationError> {
    let notification_id = path.into_inner();
    let reader = NotificationReader::new(store.into_inner());
    let campground_id = reader.open_notification(&user.0, &notification_id).await?;

    Ok(see_other(
        format!("/api/campgrounds/{}", campground_id),
        "Notification opened",
    ))
}
