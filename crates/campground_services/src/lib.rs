//! # Campground Services
//!
//! This crate provides the campground side of the community: creating a campground
//! (which fans out notifications to the author's followers), attaching comments and
//! reviews, and the read queries behind the campground and profile pages.

/// Read queries over campgrounds and their comments and reviews.
pub mod queries;
/// Campground, comment and review creation.
pub mod service;
/// Request, response and error types for campground operations.
pub mod types;

pub use queries::CampgroundQueries;
pub use service::CampgroundService;
pub use types::*;
