//! Virtual-filesystem emulation over a flat, prefix-addressed object store.
//!
//! Cloud containers have no directories: `photos/2020/a.jpg` is one opaque
//! key, and a "directory" is a zero-byte placeholder whose key ends in `/`.
//! This crate turns such a container into a browsable tree for a
//! file-manager UI, one listing level at a time, and implements the
//! manager's lifecycle actions (create directory, rename, move, delete,
//! upload) on top of the store's write/copy/delete primitives.
//!
//! The storage backend and the host runtime (permissions, translations,
//! settings, audit log, events, image probing) are consumed through the
//! capability traits in [`store`] and [`host`]; the crate itself carries no
//! network or persistence code.

pub mod config;
pub mod errors;
pub mod host;
pub mod models;
pub mod path;
pub mod services;
pub mod store;

pub use config::SourceConfig;
pub use errors::{FieldError, SourceError, SourceResult};
pub use host::HostServices;
pub use models::contents::ObjectContents;
pub use models::entry::{Entry, EntryKind};
pub use models::preview::FilePreview;
pub use models::upload::{UploadItem, UploadReport};
pub use services::source_service::CloudSource;
pub use store::{ContainerInfo, ObjectStat, ObjectStore, StoreError, StoreResult};
