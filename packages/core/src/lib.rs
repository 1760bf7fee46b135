//! Cityline Console Core
//!
//! Content-management core for the Cityline marketing site. Most of the
//! console is plain form CRUD; this crate holds the part with invariants:
//! keeping a City, its owning Country and the catalogue singletons consistent
//! when Cities are created, moved between Countries, or deleted, and telling
//! the public site which pages went stale.
//!
//! # Modules
//!
//! - [`models`] - City, Country and catalogue singleton records
//! - [`db`] - `RecordStore` trait with in-memory and SurrealDB backends
//! - [`services`] - coordinator, country links, catalogue, slug guard, revalidation
//! - [`config`] - environment-driven runtime configuration
//! - [`api`] - axum HTTP surface for the console UI

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use config::ConsoleConfig;
pub use db::{MemoryStore, RecordStore};
pub use models::*;
pub use services::{CityCoordinator, RevalidationNotifier, SyncError};
