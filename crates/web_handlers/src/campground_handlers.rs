use actix_web::{HttpResponse, Result, web};
use uuid::Uuid;
use validator::Validate;

use auth_services::middleware::AuthenticatedUser;
use campground_services::*;
use entity_store::EntityStore;

/// Creates a campground for the authenticated user and notifies their followers
pub async fn create_campground(
    store: web::Data<dyn EntityStore>,
    user: AuthenticatedUser,
    request: web::Json<CreateCampgroundRequest>,
) -> Result<HttpResponse, CampgroundError> {
    // Validate the request
    request
        .validate()
        .map_err(|e| CampgroundError::Validation(e.to_string()))?;

    let service = CampgroundService::new(store.into_inner());
    let created = service.create_campground(&user.0, &request).await?;

    Ok(HttpResponse::Created().json(created))
}

/// Gets a campground with its comments and reviews
pub async fn get_campground(
    store: web::Data<dyn EntityStore>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, CampgroundError> {
    let campground_id = path.into_inner();
    let queries = CampgroundQueries::new(store.into_inner());
    let detail = queries.campground_detail(&campground_id).await?;

    Ok(HttpResponse::Ok().json(detail))
}

/// Posts a comment as the authenticated user
pub async fn add_comment(
    store: web::Data<dyn EntityStore>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    request: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse, CampgroundError> {
    request
        .validate()
        .map_err(|e| CampgroundError::Validation(e.to_string()))?;

    let campground_id = path.into_inner();
    let service = CampgroundService::new(store.into_inner());
    let comment = service.add_comment(&campground_id, &user.0, &request).await?;

    Ok(HttpResponse::Created().json(comment))
}

/// Posts a review as the authenticated user
pub async fn add_review(
    store: web::Data<dyn EntityStore>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    request: web::Json<CreateReviewRequest>,
) -> Result<HttpResponse, CampgroundError> {
    request
        .validate()
        .map_err(|e| CampgroundError::Validation(e.to_string()))?;

    let campground_id = path.into_inner();
    let service = CampgroundService::new(store.into_inner());
    let review = service.add_review(&campground_id, &user.0, &request).await?;

    Ok(HttpResponse::Created().json(review))
}
