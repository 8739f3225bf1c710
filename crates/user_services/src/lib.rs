//! # User Services
//!
//! This crate provides the social side of the campground community: following
//! other users and viewing a user's public profile.

/// Following other users.
pub mod follow;
/// Public user profiles.
pub mod profile;
/// Types and errors used by the user services.
pub mod types;

pub use follow::FollowService;
pub use profile::ProfileService;
pub use types::*;
