//! # Entity Store
//!
//! This crate defines the persistence port shared by the campground community services.
//! It holds the entity types (users, campgrounds, notifications, comments and reviews),
//! the [`EntityStore`] trait that adapters implement, and an in-memory adapter.

/// Entity types and the errors raised by store adapters.
pub mod types;
/// The persistence port implemented by storage adapters.
pub mod store;
/// In-memory adapter used by tests and local development.
pub mod memory;

pub use memory::InMemoryStore;
pub use store::EntityStore;
pub use types::*;
