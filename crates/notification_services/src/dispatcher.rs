use std::sync::Arc;

use entity_store::{Campground, EntityStore, NewNotification, StoreError, User};
use futures_util::future::join_all;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::types::*;

/// Creates one notification per follower when an author publishes a campground.
#[derive(Clone)]
pub struct NotificationDispatcher {
    store: Arc<dyn EntityStore>,
}

impl NotificationDispatcher {
    /// Creates a new dispatcher over the provided store.
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Notifies every follower of `author` about a freshly persisted campground.
    ///
    /// Each follower entry is handled on its own: a failure is logged and recorded
    /// in the report, and never stops the remaining followers from being notified.
    /// Duplicate follower entries each receive a notification; an entry equal to
    /// the author is skipped.
    pub async fn notify_followers_of_new_campground(
        &self,
        campground: &Campground,
        author: &User,
    ) -> DispatchReport {
        info!(
            "Dispatching campground {} by {} to {} followers",
            campground.id,
            author.username,
            author.followers.len()
        );

        let new_notification = NewNotification {
            username: author.username.clone(),
            campground_id: campground.id,
        };

        let deliveries = join_all(author.followers.iter().map(|follower_id| {
            self.notify_follower(*follower_id, author.id, &new_notification)
        }))
        .await;

        let report = DispatchReport {
            campground_id: campground.id,
            deliveries,
        };

        if report.failed() > 0 {
            warn!(
                "Campground {} dispatch incomplete: {} notified, {} failed",
                campground.id,
                report.notified(),
                report.failed()
            );
        } else {
            info!(
                "Campground {} dispatched to {} followers",
                campground.id,
                report.notified()
            );
        }

        report
    }

    async fn notify_follower(
        &self,
        follower_id: Uuid,
        author_id: Uuid,
        new_notification: &NewNotification,
    ) -> FollowerDispatch {
        if follower_id == author_id {
            debug!("Skipping self-notification for author {}", author_id);
            return FollowerDispatch {
                follower_id,
                outcome: FollowerOutcome::SkippedSelf,
            };
        }

        let outcome = match self.deliver(&follower_id, new_notification).await {
            Ok(notification_id) => FollowerOutcome::Notified { notification_id },
            Err(e) => {
                error!("Failed to notify follower {}: {}", follower_id, e);
                FollowerOutcome::Failed(e)
            }
        };

        FollowerDispatch {
            follower_id,
            outcome,
        }
    }

    /// Creates the notification, then links it into the follower's list.
    async fn deliver(
        &self,
        follower_id: &Uuid,
        new_notification: &NewNotification,
    ) -> Result<Uuid, StoreError> {
        let notification = self.store.create_notification(new_notification).await?;
        self.store
            .append_notification(follower_id, &notification.id)
            .await?;

        Ok(notification.id)
    }
}
