use std::sync::Arc;

use entity_store::{EntityKind, EntityStore, Notification, NotificationFilter, StoreError};
use tracing::info;
use uuid::Uuid;

use crate::types::NotificationError;

/// Read side of a user's notifications.
#[derive(Clone)]
pub struct NotificationReader {
    store: Arc<dyn EntityStore>,
}

impl NotificationReader {
    /// Creates a new reader over the provided store.
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Every notification delivered to the user, newest first.
    pub async fn list_notifications(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<Notification>, NotificationError> {
        self.newest_first(user_id, NotificationFilter::All).await
    }

    /// Unread notifications only, newest first. Backs the unread badge.
    pub async fn list_unread_notifications(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<Notification>, NotificationError> {
        self.newest_first(user_id, NotificationFilter::Unread).await
    }

    /// Marks one of the user's notifications as read and returns the campground it points at.
    ///
    /// Opening an already read notification leaves it read and returns the same id.
    /// A notification that was not delivered to `user_id` is reported as not found.
    pub async fn open_notification(
        &self,
        user_id: &Uuid,
        notification_id: &Uuid,
    ) -> Result<Uuid, NotificationError> {
        let recipient = self.store.find_user(user_id).await?;
        if !recipient.notifications.contains(notification_id) {
            return Err(StoreError::not_found(EntityKind::Notification, *notification_id).into());
        }

        let notification = self.store.find_notification(notification_id).await?;

        if !notification.is_read {
            self.store.mark_notification_read(notification_id).await?;
            info!("Notification {} marked as read", notification_id);
        }

        Ok(notification.campground_id)
    }

    async fn newest_first(
        &self,
        user_id: &Uuid,
        filter: NotificationFilter,
    ) -> Result<Vec<Notification>, NotificationError> {
        let mut notifications = self.store.notifications_for_user(user_id, filter).await?;

        // seq is assigned at creation and only grows
        notifications.sort_by(|a, b| b.seq.cmp(&a.seq));

        Ok(notifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity_store::{InMemoryStore, NewNotification, NewUser, User};

    async fn create_user(store: &InMemoryStore, name: &str) -> User {
        store
            .create_user(&NewUser {
                username: name.to_string(),
                email: format!("{}@example.com", name),
                avatar: None,
            })
            .await
            .unwrap()
    }

    async fn deliver(
        store: &InMemoryStore,
        recipient: &User,
        campground_id: Uuid,
    ) -> Notification {
        let notification = store
            .create_notification(&NewNotification {
                username: "alice".to_string(),
                campground_id,
            })
            .await
            .unwrap();
        store
            .append_notification(&recipient.id, &notification.id)
            .await
            .unwrap();
        notification
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = Arc::new(InMemoryStore::new());
        let bob = create_user(&store, "bob").await;
        let first = deliver(&store, &bob, Uuid::new_v4()).await;
        let second = deliver(&store, &bob, Uuid::new_v4()).await;
        let third = deliver(&store, &bob, Uuid::new_v4()).await;

        let reader = NotificationReader::new(store.clone());
        let listed = reader.list_notifications(&bob.id).await.unwrap();

        let ids: Vec<Uuid> = listed.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
        assert!(listed.windows(2).all(|pair| pair[0].seq > pair[1].seq));
    }

    #[tokio::test]
    async fn test_unread_list_is_filtered_full_list() {
        let store = Arc::new(InMemoryStore::new());
        let bob = create_user(&store, "bob").await;
        deliver(&store, &bob, Uuid::new_v4()).await;
        let opened = deliver(&store, &bob, Uuid::new_v4()).await;
        deliver(&store, &bob, Uuid::new_v4()).await;

        let reader = NotificationReader::new(store.clone());
        reader.open_notification(&bob.id, &opened.id).await.unwrap();

        let all = reader.list_notifications(&bob.id).await.unwrap();
        let unread = reader.list_unread_notifications(&bob.id).await.unwrap();

        let expected: Vec<Notification> = all.iter().filter(|n| !n.is_read).cloned().collect();
        assert_eq!(all.len(), 3);
        assert_eq!(unread, expected);
        assert!(unread.iter().all(|n| n.id != opened.id));
    }

    #[tokio::test]
    async fn test_open_is_idempotent() {
        let store = Arc::new(InMemoryStore::new());
        let bob = create_user(&store, "bob").await;
        let campground_id = Uuid::new_v4();
        let notification = deliver(&store, &bob, campground_id).await;

        let reader = NotificationReader::new(store.clone());
        let first = reader.open_notification(&bob.id, &notification.id).await.unwrap();
        let second = reader.open_notification(&bob.id, &notification.id).await.unwrap();

        assert_eq!(first, campground_id);
        assert_eq!(second, campground_id);
        assert!(store.find_notification(&notification.id).await.unwrap().is_read);
    }

    #[tokio::test]
    async fn test_open_unknown_notification() {
        let store = Arc::new(InMemoryStore::new());
        let bob = create_user(&store, "bob").await;
        let reader = NotificationReader::new(store);

        let err = reader
            .open_notification(&bob.id, &Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, NotificationError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_open_someone_elses_notification() {
        let store = Arc::new(InMemoryStore::new());
        let bob = create_user(&store, "bob").await;
        let mallory = create_user(&store, "mallory").await;
        let notification = deliver(&store, &bob, Uuid::new_v4()).await;

        let reader = NotificationReader::new(store.clone());
        let err = reader
            .open_notification(&mallory.id, &notification.id)
            .await
            .unwrap_err();

        assert!(matches!(err, NotificationError::NotFound(_)));
        assert!(!store.find_notification(&notification.id).await.unwrap().is_read);
    }

    #[tokio::test]
    async fn test_list_for_unknown_user() {
        let store = Arc::new(InMemoryStore::new());
        let reader = NotificationReader::new(store);

        let err = reader.list_notifications(&Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, NotificationError::NotFound(_)));
    }
}
