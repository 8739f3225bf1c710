use std::sync::Arc;

use entity_store::{Campground, EntityStore};
use uuid::Uuid;

use crate::types::{CampgroundDetail, CampgroundError};

/// Read queries behind the campground and profile pages.
#[derive(Clone)]
pub struct CampgroundQueries {
    store: Arc<dyn EntityStore>,
}

impl CampgroundQueries {
    /// Creates the queries over the provided store.
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Campgrounds whose author snapshot carries `user_id`.
    ///
    /// Matching is by the stored id only, so a renamed user still owns their
    /// campgrounds while those keep showing the old username.
    pub async fn campgrounds_by_author(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<Campground>, CampgroundError> {
        Ok(self.store.find_campgrounds_by_author(user_id).await?)
    }

    /// A campground with its comments in posting order and its reviews newest first.
    pub async fn campground_detail(
        &self,
        campground_id: &Uuid,
    ) -> Result<CampgroundDetail, CampgroundError> {
        let campground = self.store.find_campground(campground_id).await?;
        let comments = self.store.comments_for_campground(campground_id).await?;
        let mut reviews = self.store.reviews_for_campground(campground_id).await?;

        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(CampgroundDetail::new(campground, comments, reviews))
    }
}
