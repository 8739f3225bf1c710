use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Denormalised copy of a user's identity, embedded at creation time.
///
/// Snapshots are never refreshed: renaming a user leaves every campground,
/// comment and review they authored with the old username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSnapshot {
    /// Identifier of the authoring user
    pub id: Uuid,
    /// Username of the author at the time the entity was created
    pub username: String,
}

/// User record as kept by the store
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,
    /// Unique username
    pub username: String,
    /// Unique email address
    pub email: String,
    /// Optional avatar URL
    pub avatar: Option<String>,
    /// Ids of the users following this user, in follow order (duplicates allowed)
    pub followers: Vec<Uuid>,
    /// Ids of the notifications delivered to this user, in creation order
    pub notifications: Vec<Uuid>,
    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Snapshot of this user's current identity for embedding in authored entities.
    pub fn snapshot(&self) -> AuthorSnapshot {
        AuthorSnapshot {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// Fields required to create a user
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique username
    pub username: String,
    /// Unique email address
    pub email: String,
    /// Optional avatar URL
    pub avatar: Option<String>,
}

impl NewUser {
    /// Copy with the username trimmed and the email trimmed and lowercased.
    ///
    /// Adapters store this form and check uniqueness against it.
    pub fn normalized(&self) -> NewUser {
        NewUser {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            avatar: self.avatar.clone(),
        }
    }
}

/// Campground listing
#[derive(Debug, Clone, Serialize)]
pub struct Campground {
    /// Unique identifier for the campground
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Nightly price
    pub price: f64,
    /// Formatted address returned by the geocoder
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
    /// Ids of the attached comments, in insertion order
    pub comments: Vec<Uuid>,
    /// Ids of the attached reviews, in insertion order
    pub reviews: Vec<Uuid>,
    /// Mean review rating, 0 when there are no reviews
    pub rating: f64,
    /// Timestamp when the campground was created
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a campground
#[derive(Debug, Clone)]
pub struct NewCampground {
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
    /// Author snapshot
    pub author: AuthorSnapshot,
}

/// Notification delivered to a single follower
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    /// Unique identifier for the notification
    pub id: Uuid,
    /// Store-assigned, strictly increasing sequence number
    pub seq: i64,
    /// Username of the campground author (denormalised)
    pub username: String,
    /// Campground the notification points at
    pub campground_id: Uuid,
    /// Whether the recipient has opened the notification
    pub is_read: bool,
}

/// Fields required to create a notification
#[derive(Debug, Clone)]
pub struct NewNotification {
    /// Username of the campground author
    pub username: String,
    /// Campground the notification points at
    pub campground_id: Uuid,
}

/// Which notifications of a user's list to return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationFilter {
    /// Every notification regardless of read state
    All,
    /// Only notifications with `is_read == false`
    Unread,
}

/// Comment attached to a campground
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    /// Unique identifier for the comment
    pub id: Uuid,
    /// Comment body
    pub text: String,
    /// Author snapshot
    pub author: AuthorSnapshot,
    /// Timestamp when the comment was posted
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a comment
#[derive(Debug, Clone)]
pub struct NewComment {
    /// Comment body
    pub text: String,
    /// Author snapshot
    pub author: AuthorSnapshot,
}

/// Review attached to a campground
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    /// Unique identifier for the review
    pub id: Uuid,
    /// Review body
    pub text: String,
    /// Star rating between 1 and 5
    pub rating: i32,
    /// Author snapshot
    pub author: AuthorSnapshot,
    /// Timestamp when the review was posted
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a review
#[derive(Debug, Clone)]
pub struct NewReview {
    /// Review body
    pub text: String,
    /// Star rating between 1 and 5
    pub rating: i32,
    /// Author snapshot
    pub author: AuthorSnapshot,
}

/// Kind of entity an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A user record
    User,
    /// A campground record
    Campground,
    /// A notification record
    Notification,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::User => write!(f, "User"),
            EntityKind::Campground => write!(f, "Campground"),
            EntityKind::Notification => write!(f, "Notification"),
        }
    }
}

/// Errors raised by store adapters
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// The referenced entity does not exist
    #[error("{kind} {id} not found")]
    NotFound {
        /// Kind of the missing entity
        kind: EntityKind,
        /// Id that failed to resolve
        id: Uuid,
    },

    /// A uniqueness constraint was violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The store rejected a read or write
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl StoreError {
    /// Shorthand for a missing entity.
    pub fn not_found(kind: EntityKind, id: Uuid) -> Self {
        StoreError::NotFound { kind, id }
    }
}
