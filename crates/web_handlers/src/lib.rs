//! # Web Handlers for the Campground Community
//!
//! This crate provides the HTTP handlers and route table of the campground community.

/// Campground creation, detail, comments and reviews
mod campground_handlers;
pub use campground_handlers::*;

/// User profiles and following
mod user_handlers;
pub use user_handlers::*;

/// Notification listing and opening
mod notification_handlers;
pub use notification_handlers::*;

/// Route registration
mod routes;
pub use routes::configure_routes;

mod redirect;

#[cfg(test)]
mod test_support;
