use std::sync::Arc;

use campground_services::CampgroundQueries;
use entity_store::EntityStore;
use uuid::Uuid;

use crate::types::{UserError, UserProfile};

/// Service backing the public user page
#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn EntityStore>,
    campgrounds: CampgroundQueries,
}

impl ProfileService {
    /// Creates a new service over the provided store.
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        let campgrounds = CampgroundQueries::new(store.clone());
        Self { store, campgrounds }
    }

    /// Loads a user together with the campgrounds they authored.
    pub async fn user_profile(&self, user_id: &Uuid) -> Result<UserProfile, UserError> {
        let user = self.store.find_user(user_id).await?;
        let campgrounds = self.campgrounds.campgrounds_by_author(user_id).await?;

        Ok(UserProfile {
            follower_count: user.followers.len(),
            user: user.into(),
            campgrounds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity_store::{AuthorSnapshot, InMemoryStore, NewCampground, NewUser, User};

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

    fn campground(name: &str, author: AuthorSnapshot) -> NewCampground {
        NewCampground {
            name: name.to_string(),
            description: "Lakeside sites".to_string(),
            price: 18.5,
            location: "Bend, OR, USA".to_string(),
            lat: 44.06,
            lng: -121.31,
            image: "https://images.example.com/lake.jpg".to_string(),
            image_id: "lake".to_string(),
            author,
        }
    }

    #[tokio::test]
    async fn test_profile_lists_own_campgrounds() {
        let store = Arc::new(InMemoryStore::new());
        let alice = create_user(&store, "alice").await;
        let bob = create_user(&store, "bob").await;
        store.append_follower(&alice.id, &bob.id).await.unwrap();

        store
            .create_campground(&campground("Pine Ridge", alice.snapshot()))
            .await
            .unwrap();
        store
            .create_campground(&campground("Cedar Flats", alice.snapshot()))
            .await
            .unwrap();
        store
            .create_campground(&campground("Bob's Hollow", bob.snapshot()))
            .await
            .unwrap();

        let profile = ProfileService::new(store.clone())
            .user_profile(&alice.id)
            .await
            .unwrap();

        assert_eq!(profile.user.id, alice.id);
        assert_eq!(profile.follower_count, 1);
        let names: Vec<&str> = profile.campgrounds.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Pine Ridge", "Cedar Flats"]);
    }

    #[tokio::test]
    async fn test_profile_for_unknown_user() {
        let store = Arc::new(InMemoryStore::new());

        let err = ProfileService::new(store)
            .user_profile(&Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::NotFound(_)));
    }
}
