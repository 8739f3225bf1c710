use async_trait::async_trait;
use uuid::Uuid;

use crate::types::*;

/// Persistence port for the campground community.
///
/// Every service receives its store as an `Arc<dyn EntityStore>` at construction.
/// Adapters must make the two list appends ([`append_follower`](Self::append_follower)
/// and [`append_notification`](Self::append_notification)) single atomic writes,
/// so concurrent appends to the same user never lose an element.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Creates a user with empty follower and notification lists.
    async fn create_user(&self, user: &NewUser) -> Result<User, StoreError>;

    /// Loads a user by id.
    async fn find_user(&self, user_id: &Uuid) -> Result<User, StoreError>;

    /// Changes a user's username. Existing author snapshots are not touched.
    async fn update_username(&self, user_id: &Uuid, username: &str) -> Result<User, StoreError>;

    /// Atomically appends `follower_id` to the target's follower list and returns the
    /// updated target. Duplicates are kept.
    async fn append_follower(&self, target_id: &Uuid, follower_id: &Uuid)
    -> Result<User, StoreError>;

    /// Persists a new campground.
    async fn create_campground(&self, campground: &NewCampground)
    -> Result<Campground, StoreError>;

    /// Loads a campground by id.
    async fn find_campground(&self, campground_id: &Uuid) -> Result<Campground, StoreError>;

    /// Returns every campground whose author snapshot carries `author_id`, oldest first.
    async fn find_campgrounds_by_author(
        &self,
        author_id: &Uuid,
    ) -> Result<Vec<Campground>, StoreError>;

    /// Overwrites the aggregate rating of a campground.
    async fn set_campground_rating(
        &self,
        campground_id: &Uuid,
        rating: f64,
    ) -> Result<(), StoreError>;

    /// Persists a new unread notification and assigns its sequence number.
    async fn create_notification(
        &self,
        notification: &NewNotification,
    ) -> Result<Notification, StoreError>;

    /// Atomically appends a notification id to a user's notification list.
    async fn append_notification(
        &self,
        user_id: &Uuid,
        notification_id: &Uuid,
    ) -> Result<(), StoreError>;

    /// Loads a notification by id.
    async fn find_notification(&self, notification_id: &Uuid)
    -> Result<Notification, StoreError>;

    /// Sets `is_read` on a notification and returns the stored result.
    async fn mark_notification_read(
        &self,
        notification_id: &Uuid,
    ) -> Result<Notification, StoreError>;

    /// Resolves the notifications referenced by a user's list. No ordering is guaranteed.
    async fn notifications_for_user(
        &self,
        user_id: &Uuid,
        filter: NotificationFilter,
    ) -> Result<Vec<Notification>, StoreError>;

    /// Persists a comment and appends it to the campground's comment list in one unit.
    async fn create_comment(
        &self,
        campground_id: &Uuid,
        comment: &NewComment,
    ) -> Result<Comment, StoreError>;

    /// Resolves a campground's comments in list order.
    async fn comments_for_campground(&self, campground_id: &Uuid)
    -> Result<Vec<Comment>, StoreError>;

    /// Persists a review and appends it to the campground's review list in one unit.
    async fn create_review(
        &self,
        campground_id: &Uuid,
        review: &NewReview,
    ) -> Result<Review, StoreError>;

    /// Resolves a campground's reviews. No ordering is guaranteed.
    async fn reviews_for_campground(&self, campground_id: &Uuid)
    -> Result<Vec<Review>, StoreError>;
}
