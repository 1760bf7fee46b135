//! Service Layer Error Types
//!
//! Errors surfaced by the city coordinator and catalogue services. Only
//! failures on the primary record of an operation become a `SyncError`;
//! failures on fan-out targets are absorbed into warnings.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    /// A City with the same name (case-insensitive) or slug already exists
    #[error("A city named '{name}' already exists: {reason}")]
    DuplicateCity { name: String, reason: String },

    /// The City addressed by the operation does not exist
    #[error("City not found: {id}")]
    NotFound { id: String },

    /// Reading or writing the primary record failed
    #[error("Persistence failed: {context}")]
    PersistenceError { context: String },

    /// Re-parenting could not reconcile both Countries, so the City was left untouched
    #[error("Could not sync country relationships for city '{city_slug}': {failures:?}")]
    PartialSyncFailure {
        city_slug: String,
        failures: Vec<String>,
    },

    /// Request payload rejected before touching the store
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SyncError {
    pub fn duplicate_city(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DuplicateCity {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Wrap a store failure, keeping the full error chain in the message
    pub fn persistence(context: &str, err: anyhow::Error) -> Self {
        Self::PersistenceError {
            context: format!("{}: {:#}", context, err),
        }
    }

    pub fn partial_sync(city_slug: impl Into<String>, failures: Vec<String>) -> Self {
        Self::PartialSyncFailure {
            city_slug: city_slug.into(),
            failures,
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Stable machine-readable code for the UI layer
    pub fn code(&self) -> &'static str {
        match self {
            SyncError::DuplicateCity { .. } => "DUPLICATE_CITY",
            SyncError::NotFound { .. } => "NOT_FOUND",
            SyncError::PersistenceError { .. } => "PERSISTENCE_ERROR",
            SyncError::PartialSyncFailure { .. } => "PARTIAL_SYNC_FAILURE",
            SyncError::InvalidInput(_) => "INVALID_INPUT",
        }
    }
}
