//! Object-store capability interface.
//!
//! The crate never talks to a storage backend directly; a host-provided
//! implementation of [`ObjectStore`] supplies the handful of flat-namespace
//! primitives the emulation layer needs. Authentication, connection reuse
//! and timeouts are the implementation's concern.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Content type written on zero-length directory placeholder objects.
pub const DIRECTORY_CONTENT_TYPE: &str = "application/directory";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object `{0}` not found")]
    NotFound(String),
    #[error("container `{0}` not available")]
    Container(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    /// Opaque transport/auth fault reported by the backend client.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Public endpoint data for a container.
#[derive(Debug, Clone)]
pub struct ContainerInfo {
    pub name: String,
    /// Base URL under which the container's objects are publicly served.
    pub public_base_url: String,
}

/// Metadata the store can report for a single object without fetching its
/// payload.
#[derive(Debug, Clone)]
pub struct ObjectStat {
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
    pub content_type: Option<String>,
}

/// Flat-namespace primitives required from the backing store.
///
/// `list_by_prefix` returns keys in store-native order; callers apply their
/// own filtering and sorting. There is no move primitive: rename/move is
/// composed from `copy_object` and `delete_object` so a partial transfer is
/// observable rather than hidden inside the backend.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// All keys whose name starts with `prefix`; `None` lists the whole
    /// container.
    async fn list_by_prefix(&self, prefix: Option<&str>) -> StoreResult<Vec<String>>;

    async fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Object metadata, `None` when the key is absent.
    async fn stat(&self, key: &str) -> StoreResult<Option<ObjectStat>>;

    async fn read_object(&self, key: &str) -> StoreResult<Bytes>;

    async fn write_object(&self, key: &str, body: Bytes, content_type: &str) -> StoreResult<()>;

    async fn delete_object(&self, key: &str) -> StoreResult<()>;

    /// Server-side copy within the container.
    async fn copy_object(&self, from: &str, to: &str) -> StoreResult<()>;

    /// Names of containers with a public (CDN-enabled) endpoint.
    async fn list_public_containers(&self) -> StoreResult<Vec<String>>;

    async fn get_container(&self, name: &str) -> StoreResult<ContainerInfo>;
}
