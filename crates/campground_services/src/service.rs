use std::sync::Arc;

use entity_store::{Comment, EntityStore, NewCampground, NewComment, NewReview, Review};
use notification_services::NotificationDispatcher;
use uuid::Uuid;

use crate::types::*;

/// Service for creating campgrounds and attaching comments and reviews.
pub struct CampgroundService {
    store: Arc<dyn EntityStore>,
    dispatcher: NotificationDispatcher,
}

impl CampgroundService {
    /// Creates a new service over the provided store.
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        let dispatcher = NotificationDispatcher::new(store.clone());
        Self { store, dispatcher }
    }

    /// Creates a campground for `author_id` and notifies the author's followers.
    ///
    /// The campground is committed before any notification is attempted. Fan-out
    /// failures never fail this call; they are logged and counted in the returned
    /// dispatch summary.
    pub async fn create_campground(
        &self,
        author_id: &Uuid,
        request: &CreateCampgroundRequest,
    ) -> Result<CreatedCampground, CampgroundError> {
        // Load the author first so a missing user creates nothing
        let author = self.store.find_user(author_id).await?;

        let campground = self
            .store
            .create_campground(&NewCampground {
                name: request.name.trim().to_string(),
                description: request.description.clone(),
                price: request.price,
                location: request.location.clone(),
                lat: request.lat,
                lng: request.lng,
                image: request.image.clone(),
                image_id: request.image_id.clone(),
                author: author.snapshot(),
            })
            .await?;

        log::info!(
            "🏕️ Campground {} created by {}",
            campground.id,
            author.username
        );

        let report = self
            .dispatcher
            .notify_followers_of_new_campground(&campground, &author)
            .await;

        for failure in report.failures() {
            log::warn!(
                "Follower {} was not notified about campground {}",
                failure.follower_id,
                campground.id
            );
        }

        Ok(CreatedCampground {
            campground,
            dispatch: report.summary(),
        })
    }

    /// Posts a comment on a campground under the author's current username.
    pub async fn add_comment(
        &self,
        campground_id: &Uuid,
        author_id: &Uuid,
        request: &CreateCommentRequest,
    ) -> Result<Comment, CampgroundError> {
        let author = self.store.find_user(author_id).await?;

        let comment = self
            .store
            .create_comment(
                campground_id,
                &NewComment {
                    text: request.text.trim().to_string(),
                    author: author.snapshot(),
                },
            )
            .await?;

        Ok(comment)
    }

    /// Posts a review on a campground and refreshes the campground's mean rating.
    pub async fn add_review(
        &self,
        campground_id: &Uuid,
        author_id: &Uuid,
        request: &CreateReviewRequest,
    ) -> Result<Review, CampgroundError> {
        if !(1..=5).contains(&request.rating) {
            return Err(CampgroundError::Validation(
                "Rating must be between 1 and 5".to_string(),
            ));
        }

        let author = self.store.find_user(author_id).await?;

        let review = self
            .store
            .create_review(
                campground_id,
                &NewReview {
                    text: request.text.trim().to_string(),
                    rating: request.rating,
                    author: author.snapshot(),
                },
            )
            .await?;

        let reviews = self.store.reviews_for_campground(campground_id).await?;
        self.store
            .set_campground_rating(campground_id, average_rating(&reviews))
            .await?;

        Ok(review)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::CampgroundQueries;
    use entity_store::{InMemoryStore, NewUser, User};

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

    fn pine_ridge() -> CreateCampgroundRequest {
        CreateCampgroundRequest {
            name: "Pine Ridge".to_string(),
            description: "Quiet sites under the pines".to_string(),
            price: 25.0,
            location: "Flagstaff, AZ, USA".to_string(),
            lat: 35.19,
            lng: -111.65,
            image: "https://images.example.com/pine-ridge.jpg".to_string(),
            image_id: "pine-ridge".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_notifies_followers() {
        let store = Arc::new(InMemoryStore::new());
        let alice = create_user(&store, "alice").await;
        let bob = create_user(&store, "bob").await;
        let carol = create_user(&store, "carol").await;
        store.append_follower(&alice.id, &bob.id).await.unwrap();
        store.append_follower(&alice.id, &carol.id).await.unwrap();

        let service = CampgroundService::new(store.clone());
        let created = service
            .create_campground(&alice.id, &pine_ridge())
            .await
            .unwrap();

        assert_eq!(created.campground.author.id, alice.id);
        assert_eq!(created.campground.author.username, "alice");
        assert_eq!(created.dispatch.notified, 2);
        assert_eq!(created.dispatch.failed, 0);
        assert_eq!(store.notification_count().await, 2);
    }

    #[tokio::test]
    async fn test_create_succeeds_when_fan_out_partially_fails() {
        let store = Arc::new(InMemoryStore::new());
        let alice = create_user(&store, "alice").await;
        let bob = create_user(&store, "bob").await;
        let carol = create_user(&store, "carol").await;
        store.append_follower(&alice.id, &bob.id).await.unwrap();
        store.append_follower(&alice.id, &carol.id).await.unwrap();
        store.fail_writes_for(bob.id).await;

        let service = CampgroundService::new(store.clone());
        let created = service
            .create_campground(&alice.id, &pine_ridge())
            .await
            .unwrap();

        assert_eq!(created.dispatch.notified, 1);
        assert_eq!(created.dispatch.failed, 1);
        assert!(store.find_campground(&created.campground.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_for_unknown_author_creates_nothing() {
        let store = Arc::new(InMemoryStore::new());
        let service = CampgroundService::new(store.clone());
        let ghost = Uuid::new_v4();

        let err = service
            .create_campground(&ghost, &pine_ridge())
            .await
            .unwrap_err();

        assert!(matches!(err, CampgroundError::NotFound(_)));
        assert!(store.find_campgrounds_by_author(&ghost).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_by_author_survives_rename() {
        let store = Arc::new(InMemoryStore::new());
        let alice = create_user(&store, "alice").await;
        let bob = create_user(&store, "bob").await;

        let service = CampgroundService::new(store.clone());
        let first = service.create_campground(&alice.id, &pine_ridge()).await.unwrap();
        service.create_campground(&bob.id, &pine_ridge()).await.unwrap();

        store.update_username(&alice.id, "alice_renamed").await.unwrap();

        let queries = CampgroundQueries::new(store.clone());
        let owned = queries.campgrounds_by_author(&alice.id).await.unwrap();

        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].id, first.campground.id);
        // the snapshot keeps the name from creation time
        assert_eq!(owned[0].author.username, "alice");
    }

    #[tokio::test]
    async fn test_detail_orders_comments_and_reviews() {
        let store = Arc::new(InMemoryStore::new());
        let alice = create_user(&store, "alice").await;
        let bob = create_user(&store, "bob").await;

        let service = CampgroundService::new(store.clone());
        let campground = service
            .create_campground(&alice.id, &pine_ridge())
            .await
            .unwrap()
            .campground;

        for text in ["first", "second"] {
            service
                .add_comment(
                    &campground.id,
                    &bob.id,
                    &CreateCommentRequest {
                        text: text.to_string(),
                    },
                )
                .await
                .unwrap();
        }
        let older = service
            .add_review(
                &campground.id,
                &bob.id,
                &CreateReviewRequest {
                    text: "Great stars".to_string(),
                    rating: 5,
                },
            )
            .await
            .unwrap();
        let newer = service
            .add_review(
                &campground.id,
                &alice.id,
                &CreateReviewRequest {
                    text: "Windy".to_string(),
                    rating: 2,
                },
            )
            .await
            .unwrap();

        let detail = CampgroundQueries::new(store.clone())
            .campground_detail(&campground.id)
            .await
            .unwrap();

        let comments: Vec<&str> = detail.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(comments, vec!["first", "second"]);
        let reviews: Vec<_> = detail.reviews.iter().map(|r| r.id).collect();
        assert_eq!(reviews, vec![newer.id, older.id]);
        assert_eq!(detail.rating, 3.5);
    }

    #[tokio::test]
    async fn test_review_rating_out_of_range() {
        let store = Arc::new(InMemoryStore::new());
        let alice = create_user(&store, "alice").await;
        let service = CampgroundService::new(store.clone());
        let campground = service
            .create_campground(&alice.id, &pine_ridge())
            .await
            .unwrap()
            .campground;

        let err = service
            .add_review(
                &campground.id,
                &alice.id,
                &CreateReviewRequest {
                    text: "Off the charts".to_string(),
                    rating: 6,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CampgroundError::Validation(_)));
    }

    #[tokio::test]
    async fn test_detail_for_unknown_campground() {
        let store = Arc::new(InMemoryStore::new());
        let err = CampgroundQueries::new(store)
            .campground_detail(&Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, CampgroundError::NotFound(_)));
    }
}
