//! Raw object contents for the manager's file editing view.

use bytes::Bytes;
use chrono::{DateTime, Utc};

/// An object's payload plus the metadata the store reports for it.
#[derive(Debug, Clone)]
pub struct ObjectContents {
    pub name: String,
    pub basename: String,
    pub path: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
    pub content: Bytes,
    /// Whether the extension is in the configured image allow-list.
    pub image: bool,
}
