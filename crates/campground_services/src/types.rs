use chrono::{DateTime, Utc};
use entity_store::{AuthorSnapshot, Campground, Comment, Review, StoreError};
use notification_services::DispatchSummary;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Request structure for creating a campground.
///
/// Geocoding and image upload happen before this request is built, so it carries
/// the resolved address, coordinates and hosted image.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCampgroundRequest {
    /// Name of the campground
    #[validate(
        length(min = 1, max = 255, message = "Name is required"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    /// Description of the campground
    #[validate(
        length(min = 1, message = "Description is required"),
        custom(function = "validate_not_blank")
    )]
    pub description: String,

    /// Nightly price
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,

    /// Formatted address
    #[validate(
        length(min = 1, message = "Location is required"),
        custom(function = "validate_not_blank")
    )]
    pub location: String,

    /// Latitude of the location
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: f64,

    /// Longitude of the location
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub lng: f64,

    /// Hosted image URL
    #[validate(url(message = "Image must be a valid URL"))]
    pub image: String,

    /// Image id at the hosting provider
    #[validate(
        length(min = 1, message = "Image id is required"),
        custom(function = "validate_not_blank")
    )]
    pub image_id: String,
}

/// Request structure for posting a comment
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    /// Comment body
    #[validate(
        length(min = 1, max = 2000, message = "Comment must be 1-2000 characters"),
        custom(function = "validate_not_blank")
    )]
    pub text: String,
}

/// Request structure for posting a review
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    /// Review body
    #[validate(
        length(min = 1, max = 2000, message = "Review must be 1-2000 characters"),
        custom(function = "validate_not_blank")
    )]
    pub text: String,

    /// Star rating
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
}

/// A freshly created campground with the outcome of its follower fan-out
#[derive(Debug, Serialize)]
pub struct CreatedCampground {
    /// The persisted campground
    pub campground: Campground,
    /// Counts of the notifications sent to the author's followers
    pub dispatch: DispatchSummary,
}

/// Campground with its comments (insertion order) and reviews (newest first)
///
/// Carries the populated records in place of the campground's id lists.
#[derive(Debug, Serialize)]
pub struct CampgroundDetail {
    /// Unique identifier for the campground
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Nightly price
    pub price: f64,
    /// Formatted address
    pub location: String,
    /// Latitude of the location
    pub lat: f64,
    /// Longitude of the location
    pub lng: f64,
    /// Hosted image URL
    pub image: String,
    /// Image id at the hosting provider
    pub image_id: String,
    /// Author snapshot taken when the campground was created
    pub author: AuthorSnapshot,
    /// Mean review rating
    pub rating: f64,
    /// Timestamp when the campground was created
    pub created_at: DateTime<Utc>,
    /// Populated comments
    pub comments: Vec<Comment>,
    /// Populated reviews
    pub reviews: Vec<Review>,
}

impl CampgroundDetail {
    /// Joins a campground with its loaded comments and reviews.
    pub fn new(campground: Campground, comments: Vec<Comment>, reviews: Vec<Review>) -> Self {
        Self {
            id: campground.id,
            name: campground.name,
            description: campground.description,
            price: campground.price,
            location: campground.location,
            lat: campground.lat,
            lng: campground.lng,
            image: campground.image,
            image_id: campground.image_id,
            author: campground.author,
            rating: campground.rating,
            created_at: campground.created_at,
            comments,
            reviews,
        }
    }
}

/// Custom error type for campground operations
#[derive(Debug, thiserror::Error)]
pub enum CampgroundError {
    /// The referenced campground or user does not exist
    #[error("{0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// The store rejected a read or write
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl From<StoreError> for CampgroundError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => CampgroundError::NotFound(err.to_string()),
            StoreError::Conflict(msg) | StoreError::Persistence(msg) => {
                CampgroundError::Persistence(msg)
            }
        }
    }
}

impl actix_web::ResponseError for CampgroundError {
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::HttpResponse;

        match self {
            CampgroundError::NotFound(msg) => HttpResponse::NotFound().json(serde_json::json!({
                "error": "not_found",
                "message": msg
            })),
            CampgroundError::Validation(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "validation_error",
                "message": msg
            })),
            CampgroundError::Persistence(_) => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "internal_error",
                    "message": "An internal error occurred"
                }))
            }
        }
    }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Arithmetic mean of review ratings, 0 when there are none.
pub fn average_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let total: i64 = reviews.iter().map(|r| i64::from(r.rating)).sum();
    total as f64 / reviews.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_only_text_is_rejected() {
        let comment = CreateCommentRequest {
            text: "   ".to_string(),
        };
        let review = CreateReviewRequest {
            text: "\t\n".to_string(),
            rating: 4,
        };

        assert!(comment.validate().is_err());
        assert!(review.validate().is_err());
    }

    #[test]
    fn test_padded_text_is_accepted() {
        let comment = CreateCommentRequest {
            text: "  Bring bug spray  ".to_string(),
        };

        assert!(comment.validate().is_ok());
    }
}
