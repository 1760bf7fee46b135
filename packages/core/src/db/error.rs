//! Database Error Types
//!
//! Errors raised by record store backends. Store methods return
//! `anyhow::Result` so backends can attach context; these variants are the
//! typed causes callers may want to downcast to.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Backend could not be opened or its schema could not be defined
    #[error("Failed to initialize record store: {0}")]
    InitializationFailed(String),

    /// Invalid database path provided
    #[error("Invalid database path: {path}")]
    InvalidPath { path: PathBuf },

    /// Update or lookup addressed a record that does not exist
    #[error("{collection} record not found: {id}")]
    RecordNotFound {
        collection: &'static str,
        id: String,
    },

    /// Insert would break a unique field
    #[error("{collection}.{field} must be unique, '{value}' already exists")]
    UniqueViolation {
        collection: &'static str,
        field: &'static str,
        value: String,
    },
}

impl DatabaseError {
    pub fn initialization_failed(msg: impl Into<String>) -> Self {
        Self::InitializationFailed(msg.into())
    }

    pub fn record_not_found(collection: &'static str, id: impl Into<String>) -> Self {
        Self::RecordNotFound {
            collection,
            id: id.into(),
        }
    }

    pub fn unique_violation(
        collection: &'static str,
        field: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self::UniqueViolation {
            collection,
            field,
            value: value.into(),
        }
    }
}
