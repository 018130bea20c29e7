//! Upload batch inputs and per-item outcomes.

use bytes::Bytes;
use serde::Serialize;

/// A single staged item submitted to the upload pipeline. Items are value
/// objects created per request and discarded once the batch completes.
#[derive(Debug, Clone)]
pub struct UploadItem {
    /// Filename as submitted by the client.
    pub name: String,
    pub content: Bytes,
    pub size: u64,
    /// Declared content type; the store default applies when absent.
    pub content_type: Option<String>,
    /// Transport-level failure reported by the host before the pipeline
    /// ran; such items are skipped without recording an error.
    pub transport_error: Option<String>,
}

impl UploadItem {
    pub fn new(name: impl Into<String>, content: Bytes) -> Self {
        let size = content.len() as u64;
        Self {
            name: name.into(),
            content,
            size,
            content_type: None,
            transport_error: None,
        }
    }
}

/// What happened to one item of an upload batch.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadOutcome {
    Written { key: String },
    Rejected { reason: String },
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadItemReport {
    pub name: String,
    #[serde(flatten)]
    pub outcome: UploadOutcome,
}

/// Full batch result handed to the upload event hook.
#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    pub directory: String,
    pub files: Vec<UploadItemReport>,
}
