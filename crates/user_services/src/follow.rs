use std::sync::Arc;

use entity_store::{EntityStore, User};
use uuid::Uuid;

use crate::types::UserError;

/// Service for following other users
#[derive(Clone)]
pub struct FollowService {
    store: Arc<dyn EntityStore>,
}

impl FollowService {
    /// Creates a new service over the provided store.
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Adds `follower_id` to the target's follower list and returns the updated target.
    ///
    /// Following twice adds a second entry, and following yourself is allowed.
    /// Each follower entry receives its own notification on the target's next campground.
    pub async fn follow(&self, follower_id: &Uuid, target_id: &Uuid) -> Result<User, UserError> {
        let target = self.store.append_follower(target_id, follower_id).await?;

        log::info!("User {} now follows {}", follower_id, target.username);

        Ok(target)
    }
}
