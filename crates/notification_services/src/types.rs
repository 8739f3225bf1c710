use entity_store::StoreError;
use serde::Serialize;
use uuid::Uuid;

/// Errors raised by the notification services.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    /// The referenced user or notification does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The store rejected a read or write.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Some followers could not be notified while others were.
    #[error("Notification dispatch failed for {failed} of {attempted} followers")]
    PartialDispatch {
        /// Number of followers whose notification failed
        failed: usize,
        /// Number of followers a notification was attempted for
        attempted: usize,
    },
}

impl From<StoreError> for NotificationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => NotificationError::NotFound(err.to_string()),
            StoreError::Conflict(msg) | StoreError::Persistence(msg) => {
                NotificationError::Persistence(msg)
            }
        }
    }
}

impl actix_web::ResponseError for NotificationError {
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::HttpResponse;

        match self {
            NotificationError::NotFound(msg) => HttpResponse::NotFound().json(serde_json::json!({
                "error": "not_found",
                "message": msg
            })),
            NotificationError::PartialDispatch { .. } => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "partial_dispatch_failure",
                    "message": self.to_string()
                }))
            }
            _ => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "internal_error",
                "message": "An internal error occurred"
            })),
        }
    }
}

/// Result of notifying one entry of the author's follower list.
#[derive(Debug, Clone, PartialEq)]
pub enum FollowerOutcome {
    /// The notification was created and appended to the follower's list.
    Notified {
        /// Id of the delivered notification
        notification_id: Uuid,
    },
    /// The follower entry is the author; nothing was created.
    SkippedSelf,
    /// Creating or delivering the notification failed.
    Failed(StoreError),
}

/// Outcome for a single follower entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowerDispatch {
    /// Follower the notification was meant for
    pub follower_id: Uuid,
    /// What happened for this follower
    pub outcome: FollowerOutcome,
}

/// Per-follower outcomes of one campground fan-out, in follower-list order.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    /// Campground the notifications point at
    pub campground_id: Uuid,
    /// One entry per follower-list entry
    pub deliveries: Vec<FollowerDispatch>,
}

/// Counts of a [`DispatchReport`], suitable for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
    /// Followers that received a notification
    pub notified: usize,
    /// Follower entries skipped because they are the author
    pub skipped: usize,
    /// Followers whose notification failed
    pub failed: usize,
}

impl DispatchReport {
    /// Number of followers that received a notification.
    pub fn notified(&self) -> usize {
        self.deliveries
            .iter()
            .filter(|d| matches!(d.outcome, FollowerOutcome::Notified { .. }))
            .count()
    }

    /// Number of follower entries skipped as self-notifications.
    pub fn skipped(&self) -> usize {
        self.deliveries
            .iter()
            .filter(|d| d.outcome == FollowerOutcome::SkippedSelf)
            .count()
    }

    /// Number of followers whose notification failed.
    pub fn failed(&self) -> usize {
        self.failures().count()
    }

    /// Follower entries for which a notification was attempted.
    pub fn attempted(&self) -> usize {
        self.deliveries.len() - self.skipped()
    }

    /// The failed deliveries.
    pub fn failures(&self) -> impl Iterator<Item = &FollowerDispatch> {
        self.deliveries
            .iter()
            .filter(|d| matches!(d.outcome, FollowerOutcome::Failed(_)))
    }

    /// Collapses the report into its counts.
    pub fn summary(&self) -> DispatchSummary {
        DispatchSummary {
            notified: self.notified(),
            skipped: self.skipped(),
            failed: self.failed(),
        }
    }

    /// Returns the report unchanged when every attempt succeeded, or a
    /// [`NotificationError::PartialDispatch`] otherwise.
    pub fn into_result(self) -> Result<DispatchReport, NotificationError> {
        let failed = self.failed();
        if failed > 0 {
            return Err(NotificationError::PartialDispatch {
                failed,
                attempted: self.attempted(),
            });
        }
        Ok(self)
    }
}
