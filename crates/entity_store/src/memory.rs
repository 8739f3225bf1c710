use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::store::EntityStore;
use crate::types::*;

/// In-memory [`EntityStore`] backed by hash maps behind a single async mutex.
///
/// Each trait call holds the lock for its whole duration, which gives the same
/// per-operation atomicity the PostgreSQL adapter gets from single statements.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    campgrounds: HashMap<Uuid, Campground>,
    campground_order: Vec<Uuid>,
    notifications: HashMap<Uuid, Notification>,
    comments: HashMap<Uuid, Comment>,
    reviews: HashMap<Uuid, Review>,
    next_seq: i64,
    last_timestamp: Option<DateTime<Utc>>,
    /// Users whose record rejects every list append
    failing_users: HashSet<Uuid>,
}

impl MemoryState {
    /// Wall-clock time, nudged forward so consecutive writes never share a timestamp.
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(ts);
        ts
    }

    fn reject_if_failing(&self, user_id: &Uuid) -> Result<(), StoreError> {
        if self.failing_users.contains(user_id) {
            return Err(StoreError::Persistence(format!(
                "write rejected for user {}",
                user_id
            )));
        }
        Ok(())
    }
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later list append on `user_id` fail with a persistence error.
    pub async fn fail_writes_for(&self, user_id: Uuid) {
        self.state.lock().await.failing_users.insert(user_id);
    }

    /// Number of notification records held, whoever they were delivered to.
    pub async fn notification_count(&self) -> usize {
        self.state.lock().await.notifications.len()
    }
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn create_user(&self, user: &NewUser) -> Result<User, StoreError> {
        let user = user.normalized();
        let mut state = self.state.lock().await;

        if state.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict(format!(
                "username {} is taken",
                user.username
            )));
        }
        if state.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!(
                "email {} is taken",
                user.email
            )));
        }

        let created = User {
            id: Uuid::new_v4(),
            username: user.username.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
            followers: Vec::new(),
            notifications: Vec::new(),
            created_at: state.next_timestamp(),
        };
        state.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_user(&self, user_id: &Uuid) -> Result<User, StoreError> {
        let state = self.state.lock().await;
        state
            .users
            .get(user_id)
            .cloned()
            .ok_or(StoreError::not_found(EntityKind::User, *user_id))
    }

    async fn update_username(&self, user_id: &Uuid, username: &str) -> Result<User, StoreError> {
        let username = username.trim();
        let mut state = self.state.lock().await;

        if state
            .users
            .values()
            .any(|u| u.username == username && u.id != *user_id)
        {
            return Err(StoreError::Conflict(format!(
                "username {} is taken",
                username
            )));
        }

        let user = state
            .users
            .get_mut(user_id)
            .ok_or(StoreError::not_found(EntityKind::User, *user_id))?;
        user.username = username.to_string();
        Ok(user.clone())
    }

    async fn append_follower(
        &self,
        target_id: &Uuid,
        follower_id: &Uuid,
    ) -> Result<User, StoreError> {
        let mut state = self.state.lock().await;
        state.reject_if_failing(target_id)?;

        let target = state
            .users
            .get_mut(target_id)
            .ok_or(StoreError::not_found(EntityKind::User, *target_id))?;
        target.followers.push(*follower_id);
        Ok(target.clone())
    }

    async fn create_campground(
        &self,
        campground: &NewCampground,
    ) -> Result<Campground, StoreError> {
        let mut state = self.state.lock().await;

        let created = Campground {
            id: Uuid::new_v4(),
            name: campground.name.clone(),
            description: campground.description.clone(),
            price: campground.price,
            location: campground.location.clone(),
            lat: campground.lat,
            lng: campground.lng,
            image: campground.image.clone(),
            image_id: campground.image_id.clone(),
            author: campground.author.clone(),
            comments: Vec::new(),
            reviews: Vec::new(),
            rating: 0.0,
            created_at: state.next_timestamp(),
        };
        state.campground_order.push(created.id);
        state.campgrounds.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_campground(&self, campground_id: &Uuid) -> Result<Campground, StoreError> {
        let state = self.state.lock().await;
        state
            .campgrounds
            .get(campground_id)
            .cloned()
            .ok_or(StoreError::not_found(EntityKind::Campground, *campground_id))
    }

    async fn find_campgrounds_by_author(
        &self,
        author_id: &Uuid,
    ) -> Result<Vec<Campground>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .campground_order
            .iter()
            .filter_map(|id| state.campgrounds.get(id))
            .filter(|c| c.author.id == *author_id)
            .cloned()
            .collect())
    }

    async fn set_campground_rating(
        &self,
        campground_id: &Uuid,
        rating: f64,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let campground = state
            .campgrounds
            .get_mut(campground_id)
            .ok_or(StoreError::not_found(EntityKind::Campground, *campground_id))?;
        campground.rating = rating;
        Ok(())
    }

    async fn create_notification(
        &self,
        notification: &NewNotification,
    ) -> Result<Notification, StoreError> {
        let mut state = self.state.lock().await;

        state.next_seq += 1;
        let created = Notification {
            id: Uuid::new_v4(),
            seq: state.next_seq,
            username: notification.username.clone(),
            campground_id: notification.campground_id,
            is_read: false,
        };
        state.notifications.insert(created.id, created.clone());
        Ok(created)
    }

    async fn append_notification(
        &self,
        user_id: &Uuid,
        notification_id: &Uuid,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.reject_if_failing(user_id)?;

        let user = state
            .users
            .get_mut(user_id)
            .ok_or(StoreError::not_found(EntityKind::User, *user_id))?;
        user.notifications.push(*notification_id);
        Ok(())
    }

    async fn find_notification(
        &self,
        notification_id: &Uuid,
    ) -> Result<Notification, StoreError> {
        let state = self.state.lock().await;
        state
            .notifications
            .get(notification_id)
            .cloned()
            .ok_or(StoreError::not_found(
                EntityKind::Notification,
                *notification_id,
            ))
    }

    async fn mark_notification_read(
        &self,
        notification_id: &Uuid,
    ) -> Result<Notification, StoreError> {
        let mut state = self.state.lock().await;
        let notification = state
            .notifications
            .get_mut(notification_id)
            .ok_or(StoreError::not_found(
                EntityKind::Notification,
                *notification_id,
            ))?;
        notification.is_read = true;
        Ok(notification.clone())
    }

    async fn notifications_for_user(
        &self,
        user_id: &Uuid,
        filter: NotificationFilter,
    ) -> Result<Vec<Notification>, StoreError> {
        let state = self.state.lock().await;
        let user = state
            .users
            .get(user_id)
            .ok_or(StoreError::not_found(EntityKind::User, *user_id))?;

        Ok(user
            .notifications
            .iter()
            .filter_map(|id| state.notifications.get(id))
            .filter(|n| filter == NotificationFilter::All || !n.is_read)
            .cloned()
            .collect())
    }

    async fn create_comment(
        &self,
        campground_id: &Uuid,
        comment: &NewComment,
    ) -> Result<Comment, StoreError> {
        let mut state = self.state.lock().await;
        if !state.campgrounds.contains_key(campground_id) {
            return Err(StoreError::not_found(EntityKind::Campground, *campground_id));
        }

        let created = Comment {
            id: Uuid::new_v4(),
            text: comment.text.clone(),
            author: comment.author.clone(),
            created_at: state.next_timestamp(),
        };
        state.comments.insert(created.id, created.clone());
        if let Some(campground) = state.campgrounds.get_mut(campground_id) {
            campground.comments.push(created.id);
        }
        Ok(created)
    }

    async fn comments_for_campground(
        &self,
        campground_id: &Uuid,
    ) -> Result<Vec<Comment>, StoreError> {
        let state = self.state.lock().await;
        let campground = state
            .campgrounds
            .get(campground_id)
            .ok_or(StoreError::not_found(EntityKind::Campground, *campground_id))?;

        Ok(campground
            .comments
            .iter()
            .filter_map(|id| state.comments.get(id))
            .cloned()
            .collect())
    }

    async fn create_review(
        &self,
        campground_id: &Uuid,
        review: &NewReview,
    ) -> Result<Review, StoreError> {
        let mut state = self.state.lock().await;
        if !state.campgrounds.contains_key(campground_id) {
            return Err(StoreError::not_found(EntityKind::Campground, *campground_id));
        }

        let created = Review {
            id: Uuid::new_v4(),
            text: review.text.clone(),
            rating: review.rating,
            author: review.author.clone(),
            created_at: state.next_timestamp(),
        };
        state.reviews.insert(created.id, created.clone());
        if let Some(campground) = state.campgrounds.get_mut(campground_id) {
            campground.reviews.push(created.id);
        }
        Ok(created)
    }

    async fn reviews_for_campground(
        &self,
        campground_id: &Uuid,
    ) -> Result<Vec<Review>, StoreError> {
        let state = self.state.lock().await;
        let campground = state
            .campgrounds
            .get(campground_id)
            .ok_or(StoreError::not_found(EntityKind::Campground, *campground_id))?;

        Ok(campground
            .reviews
            .iter()
            .filter_map(|id| state.reviews.get(id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.to_string(),
            email: format!("{}@example.com", name),
            avatar: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected() {
        let store = InMemoryStore::new();
        store.create_user(&new_user("alice")).await.unwrap();

        let err = store.create_user(&new_user("alice")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_user_normalizes_identity() {
        let store = InMemoryStore::new();
        let created = store
            .create_user(&NewUser {
                username: "  alice ".to_string(),
                email: " Alice@Example.COM ".to_string(),
                avatar: None,
            })
            .await
            .unwrap();

        assert_eq!(created.username, "alice");
        assert_eq!(created.email, "alice@example.com");

        let err = store
            .create_user(&NewUser {
                username: "alice2".to_string(),
                email: "ALICE@example.com".to_string(),
                avatar: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_notification_sequence_increases() {
        let store = InMemoryStore::new();
        let new = NewNotification {
            username: "alice".to_string(),
            campground_id: Uuid::new_v4(),
        };

        let first = store.create_notification(&new).await.unwrap();
        let second = store.create_notification(&new).await.unwrap();

        assert!(second.seq > first.seq);
        assert!(!first.is_read);
    }

    #[tokio::test]
    async fn test_failing_user_rejects_appends() {
        let store = InMemoryStore::new();
        let user = store.create_user(&new_user("bob")).await.unwrap();
        store.fail_writes_for(user.id).await;

        let err = store
            .append_notification(&user.id, &Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Persistence(_)));
        assert!(store.find_user(&user.id).await.unwrap().notifications.is_empty());
    }

    #[tokio::test]
    async fn test_comment_on_missing_campground() {
        let store = InMemoryStore::new();
        let author = store.create_user(&new_user("carol")).await.unwrap();
        let missing = Uuid::new_v4();

        let err = store
            .create_comment(
                &missing,
                &NewComment {
                    text: "hello".to_string(),
                    author: author.snapshot(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::not_found(EntityKind::Campground, missing));
    }
}
