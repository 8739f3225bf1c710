use campground_services::CampgroundError;
use chrono::{DateTime, Utc};
use entity_store::{Campground, StoreError, User};
use serde::Serialize;
use uuid::Uuid;

/// The parts of a user record shown to other users
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    /// Unique identifier for the user
    pub id: Uuid,
    /// Current username
    pub username: String,
    /// Optional avatar URL
    pub avatar: Option<String>,
    /// Timestamp when the user joined
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            avatar: user.avatar,
            created_at: user.created_at,
        }
    }
}

/// A user's public page: the user and the campgrounds they authored
#[derive(Debug, Serialize)]
pub struct UserProfile {
    /// The profiled user
    pub user: PublicUser,
    /// Number of entries in the user's follower list
    pub follower_count: usize,
    /// Campgrounds authored by the user, oldest first
    pub campgrounds: Vec<Campground>,
}

/// Custom error type for user operations
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// The referenced user does not exist
    #[error("{0}")]
    NotFound(String),

    /// The store rejected a read or write
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl From<StoreError> for UserError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => UserError::NotFound(err.to_string()),
            StoreError::Conflict(msg) | StoreError::Persistence(msg) => {
                UserError::Persistence(msg)
            }
        }
    }
}

impl From<CampgroundError> for UserError {
    fn from(err: CampgroundError) -> Self {
        match err {
            CampgroundError::NotFound(msg) => UserError::NotFound(msg),
            CampgroundError::Validation(msg) | CampgroundError::Persistence(msg) => {
                UserError::Persistence(msg)
            }
        }
    }
}

impl actix_web::ResponseError for UserError {
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::HttpResponse;

        match self {
            UserError::NotFound(msg) => HttpResponse::NotFound().json(serde_json::json!({
                "error": "not_found",
                "message": msg
            })),
            UserError::Persistence(_) => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "internal_error",
                    "message": "An internal error occurred"
                }))
            }
        }
    }
}
