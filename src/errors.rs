//! Error taxonomy for source operations.
//!
//! Typed faults travel as [`SourceError`] between internal layers; the
//! manager-facing entry points flatten them into field-scoped
//! [`FieldError`] messages collected on the source, so a failed operation
//! reports a success flag plus readable messages instead of raising.

use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("`{path}` not found")]
    NotFound { path: String },
    #[error("`{path}` already exists")]
    Exists { path: String },
    #[error("{reason}")]
    Validation { reason: String },
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Copy half of a rename/move succeeded but the delete half failed,
    /// leaving both keys in the container.
    #[error("copy of `{from}` to `{to}` succeeded but the source was not removed")]
    Inconsistent { from: String, to: String },
}

pub type SourceResult<T> = Result<T, SourceError>;

/// A field-scoped, human-readable failure collected for UI display.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    /// Form field the message belongs to (`file`, `name`, `path`).
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
