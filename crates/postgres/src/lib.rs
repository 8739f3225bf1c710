//! # Postgres
//!
//! This crate provides the PostgreSQL adapter for the campground community entity store.

/// Connection pool and schema migrations.
pub mod database;
/// `EntityStore` implementation backed by PostgreSQL.
pub mod store;

pub use store::PgEntityStore;
