//! # Auth Services
//!
//! This crate is the boundary with the external authentication subsystem.
//! It verifies the bearer tokens that subsystem issues and exposes the
//! authenticated user id to request handlers.

/// JWT token handling.
pub mod jwt;
/// Middleware for request authentication.
pub mod middleware;
/// Types and structures used in authentication services.
pub mod types;
