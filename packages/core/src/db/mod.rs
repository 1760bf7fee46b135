//! Database Layer
//!
//! The [`RecordStore`] trait is the only way services touch persisted data.
//! Two backends implement it:
//!
//! - [`MemoryStore`] - in-process maps, used when no database path is configured
//! - [`SurrealStore`] - embedded SurrealDB on RocksDB (feature `surrealdb`)

mod error;
mod memory_store;
mod record_store;
#[cfg(feature = "surrealdb")]
mod surreal_store;

pub use error::DatabaseError;
pub use memory_store::MemoryStore;
pub use record_store::RecordStore;
#[cfg(feature = "surrealdb")]
pub use surreal_store::SurrealStore;
