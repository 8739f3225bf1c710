//! # Notification Services
//!
//! This crate provides the notification workflow of the campground community.
//! It fans a new campground out to the author's followers and lets each user
//! read and open the notifications delivered to them.

/// Fan-out of new campgrounds to the author's followers.
pub mod dispatcher;
/// Listing and opening a user's notifications.
pub mod reader;
/// Types and errors used by the notification services.
pub mod types;

pub use dispatcher::NotificationDispatcher;
pub use reader::NotificationReader;
pub use types::*;
