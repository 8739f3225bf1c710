use std::collections::HashMap;

use async_trait::async_trait;
use entity_store::*;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, email, avatar, followers, notifications, created_at";

const CAMPGROUND_COLUMNS: &str = "id, name, description, price, location, lat, lng, image, \
     image_id, author_id, author_username, comments, reviews, rating, created_at";

const NOTIFICATION_COLUMNS: &str = "id, seq, username, campground_id, is_read";

const COMMENT_COLUMNS: &str = "id, text, author_id, author_username, created_at";

const REVIEW_COLUMNS: &str = "id, text, rating, author_id, author_username, created_at";

/// [`EntityStore`] backed by a PostgreSQL connection pool.
///
/// Reference lists live in `UUID[]` columns and are only ever grown with
/// `array_append` inside a single `UPDATE`, so concurrent appends cannot
/// overwrite each other.
#[derive(Clone)]
pub struct PgEntityStore {
    pool: PgPool,
}

impl PgEntityStore {
    /// Creates a new store over the provided database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a driver error onto the store error taxonomy.
fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(db.message().to_string())
        }
        _ => {
            log::error!("❌ Database error: {}", err);
            StoreError::Persistence(err.to_string())
        }
    }
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        avatar: row.get("avatar"),
        followers: row.get("followers"),
        notifications: row.get("notifications"),
        created_at: row.get("created_at"),
    }
}

fn campground_from_row(row: &PgRow) -> Campground {
    Campground {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        price: row.get("price"),
        location: row.get("location"),
        lat: row.get("lat"),
        lng: row.get("lng"),
        image: row.get("image"),
        image_id: row.get("image_id"),
        author: AuthorSnapshot {
            id: row.get("author_id"),
            username: row.get("author_username"),
        },
        comments: row.get("comments"),
        reviews: row.get("reviews"),
        rating: row.get("rating"),
        created_at: row.get("created_at"),
    }
}

fn notification_from_row(row: &PgRow) -> Notification {
    Notification {
        id: row.get("id"),
        seq: row.get("seq"),
        username: row.get("username"),
        campground_id: row.get("campground_id"),
        is_read: row.get("is_read"),
    }
}

fn comment_from_row(row: &PgRow) -> Comment {
    Comment {
        id: row.get("id"),
        text: row.get("text"),
        author: AuthorSnapshot {
            id: row.get("author_id"),
            username: row.get("author_username"),
        },
        created_at: row.get("created_at"),
    }
}

fn review_from_row(row: &PgRow) -> Review {
    Review {
        id: row.get("id"),
        text: row.get("text"),
        rating: row.get("rating"),
        author: AuthorSnapshot {
            id: row.get("author_id"),
            username: row.get("author_username"),
        },
        created_at: row.get("created_at"),
    }
}

impl PgEntityStore {
    /// Loads one of the reference-list columns of a campground.
    async fn campground_refs(
        &self,
        campground_id: &Uuid,
        column: &str,
    ) -> Result<Vec<Uuid>, StoreError> {
        let row = sqlx::query(&format!("SELECT {} FROM campgrounds WHERE id = $1", column))
            .bind(campground_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or(StoreError::not_found(EntityKind::Campground, *campground_id))?;

        Ok(row.get(column))
    }
}

#[async_trait]
impl EntityStore for PgEntityStore {
    async fn create_user(&self, user: &NewUser) -> Result<User, StoreError> {
        let user = user.normalized();
        let row = sqlx::query(&format!(
            "INSERT INTO users (username, email, avatar) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.avatar)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(user_from_row(&row))
    }

    async fn find_user(&self, user_id: &Uuid) -> Result<User, StoreError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(|row| user_from_row(&row))
            .ok_or(StoreError::not_found(EntityKind::User, *user_id))
    }

    async fn update_username(&self, user_id: &Uuid, username: &str) -> Result<User, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE users SET username = $1 WHERE id = $2 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(username.trim())
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(|row| user_from_row(&row))
            .ok_or(StoreError::not_found(EntityKind::User, *user_id))
    }

    async fn append_follower(
        &self,
        target_id: &Uuid,
        follower_id: &Uuid,
    ) -> Result<User, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE users SET followers = array_append(followers, $1) WHERE id = $2 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(follower_id)
        .bind(target_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(|row| user_from_row(&row))
            .ok_or(StoreError::not_found(EntityKind::User, *target_id))
    }

    async fn create_campground(
        &self,
        campground: &NewCampground,
    ) -> Result<Campground, StoreError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO campgrounds (
                name, description, price, location, lat, lng,
                image, image_id, author_id, author_username
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            CAMPGROUND_COLUMNS
        ))
        .bind(campground.name.trim())
        .bind(&campground.description)
        .bind(campground.price)
        .bind(&campground.location)
        .bind(campground.lat)
        .bind(campground.lng)
        .bind(&campground.image)
        .bind(&campground.image_id)
        .bind(campground.author.id)
        .bind(&campground.author.username)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(campground_from_row(&row))
    }

    async fn find_campground(&self, campground_id: &Uuid) -> Result<Campground, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM campgrounds WHERE id = $1",
            CAMPGROUND_COLUMNS
        ))
        .bind(campground_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(|row| campground_from_row(&row))
            .ok_or(StoreError::not_found(EntityKind::Campground, *campground_id))
    }

    async fn find_campgrounds_by_author(
        &self,
        author_id: &Uuid,
    ) -> Result<Vec<Campground>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM campgrounds WHERE author_id = $1 ORDER BY created_at ASC",
            CAMPGROUND_COLUMNS
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.iter().map(campground_from_row).collect())
    }

    async fn set_campground_rating(
        &self,
        campground_id: &Uuid,
        rating: f64,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE campgrounds SET rating = $1 WHERE id = $2")
            .bind(rating)
            .bind(campground_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(EntityKind::Campground, *campground_id));
        }

        Ok(())
    }

    async fn create_notification(
        &self,
        notification: &NewNotification,
    ) -> Result<Notification, StoreError> {
        let row = sqlx::query(&format!(
            "INSERT INTO notifications (username, campground_id) VALUES ($1, $2) RETURNING {}",
            NOTIFICATION_COLUMNS
        ))
        .bind(&notification.username)
        .bind(notification.campground_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(notification_from_row(&row))
    }

    async fn append_notification(
        &self,
        user_id: &Uuid,
        notification_id: &Uuid,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE users SET notifications = array_append(notifications, $1) WHERE id = $2",
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(EntityKind::User, *user_id));
        }

        Ok(())
    }

    async fn find_notification(
        &self,
        notification_id: &Uuid,
    ) -> Result<Notification, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM notifications WHERE id = $1",
            NOTIFICATION_COLUMNS
        ))
        .bind(notification_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(|row| notification_from_row(&row)).ok_or(StoreError::not_found(
            EntityKind::Notification,
            *notification_id,
        ))
    }

    async fn mark_notification_read(
        &self,
        notification_id: &Uuid,
    ) -> Result<Notification, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 RETURNING {}",
            NOTIFICATION_COLUMNS
        ))
        .bind(notification_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(|row| notification_from_row(&row)).ok_or(StoreError::not_found(
            EntityKind::Notification,
            *notification_id,
        ))
    }

    async fn notifications_for_user(
        &self,
        user_id: &Uuid,
        filter: NotificationFilter,
    ) -> Result<Vec<Notification>, StoreError> {
        let user = self.find_user(user_id).await?;

        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM notifications
            WHERE id = ANY($1) AND ($2 = FALSE OR is_read = FALSE)
            "#,
            NOTIFICATION_COLUMNS
        ))
        .bind(&user.notifications)
        .bind(filter == NotificationFilter::Unread)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.iter().map(notification_from_row).collect())
    }

    async fn create_comment(
        &self,
        campground_id: &Uuid,
        comment: &NewComment,
    ) -> Result<Comment, StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let row = sqlx::query(&format!(
            "INSERT INTO comments (text, author_id, author_username) VALUES ($1, $2, $3) RETURNING {}",
            COMMENT_COLUMNS
        ))
        .bind(&comment.text)
        .bind(comment.author.id)
        .bind(&comment.author.username)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;
        let created = comment_from_row(&row);

        let result =
            sqlx::query("UPDATE campgrounds SET comments = array_append(comments, $1) WHERE id = $2")
                .bind(created.id)
                .bind(campground_id)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;

        // Dropping the transaction rolls back the orphaned insert
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(EntityKind::Campground, *campground_id));
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(created)
    }

    async fn comments_for_campground(
        &self,
        campground_id: &Uuid,
    ) -> Result<Vec<Comment>, StoreError> {
        let refs = self.campground_refs(campground_id, "comments").await?;

        let rows = sqlx::query(&format!(
            "SELECT {} FROM comments WHERE id = ANY($1)",
            COMMENT_COLUMNS
        ))
        .bind(&refs)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let mut by_id: HashMap<Uuid, Comment> = rows
            .iter()
            .map(comment_from_row)
            .map(|comment| (comment.id, comment))
            .collect();

        Ok(refs.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn create_review(
        &self,
        campground_id: &Uuid,
        review: &NewReview,
    ) -> Result<Review, StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO reviews (text, rating, author_id, author_username)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            REVIEW_COLUMNS
        ))
        .bind(&review.text)
        .bind(review.rating)
        .bind(review.author.id)
        .bind(&review.author.username)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;
        let created = review_from_row(&row);

        let result =
            sqlx::query("UPDATE campgrounds SET reviews = array_append(reviews, $1) WHERE id = $2")
                .bind(created.id)
                .bind(campground_id)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(EntityKind::Campground, *campground_id));
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(created)
    }

    async fn reviews_for_campground(
        &self,
        campground_id: &Uuid,
    ) -> Result<Vec<Review>, StoreError> {
        let refs = self.campground_refs(campground_id, "reviews").await?;

        let rows = sqlx::query(&format!(
            "SELECT {} FROM reviews WHERE id = ANY($1)",
            REVIEW_COLUMNS
        ))
        .bind(&refs)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.iter().map(review_from_row).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_row_maps_to_persistence_error() {
        let err = map_sqlx_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Persistence(_)));
    }

    #[test]
    fn test_pool_timeout_maps_to_persistence_error() {
        let err = map_sqlx_error(sqlx::Error::PoolTimedOut);
        assert_eq!(
            err,
            StoreError::Persistence(sqlx::Error::PoolTimedOut.to_string())
        );
    }
}
