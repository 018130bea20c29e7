//! src/services/source_service.rs
//!
//! CloudSource — the virtual-filesystem layer over one flat object
//! container. Listing calls convert the container's key set into one level
//! of a directory tree; lifecycle calls translate logical file-manager
//! actions into store writes, copies and deletes. Every manager-facing
//! operation reports a success flag and collects field-scoped messages
//! instead of raising; store faults never escape to the UI layer.

use std::collections::BTreeSet;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, error, warn};

use crate::config::SourceConfig;
use crate::errors::{FieldError, SourceError, SourceResult};
use crate::host::HostServices;
use crate::models::contents::ObjectContents;
use crate::models::entry::{Entry, MenuAction};
use crate::models::preview::FilePreview;
use crate::models::upload::{UploadItem, UploadItemReport, UploadOutcome, UploadReport};
use crate::path::{SEPARATOR, basename, extension, is_directory_key, normalize_key, parent_dir, sanitize_name};
use crate::services::thumbnail::{self, RenderSpec};
use crate::services::tree;
use crate::store::{DIRECTORY_CONTENT_TYPE, ObjectStore};

/// Event fired once per completed upload batch.
const UPLOAD_EVENT: &str = "OnFileManagerUpload";

/// A media source backed by one public container of a flat object store.
///
/// Each instance holds its own resolved configuration and store handle, so
/// several sources with different credentials can live in one process.
pub struct CloudSource {
    config: SourceConfig,
    store: Arc<dyn ObjectStore>,
    host: HostServices,
    errors: Vec<FieldError>,
}

impl CloudSource {
    pub fn new(config: SourceConfig, store: Arc<dyn ObjectStore>, host: HostServices) -> Self {
        Self {
            config,
            store,
            host,
            errors: Vec::new(),
        }
    }

    /// Construct a source whose configuration is resolved from the host's
    /// property store.
    pub fn from_host_settings(id: u32, store: Arc<dyn ObjectStore>, host: HostServices) -> Self {
        let config = SourceConfig::from_settings(id, host.settings.as_ref());
        Self::new(config, store, host)
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Field-scoped messages collected by failed operations.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<FieldError> {
        std::mem::take(&mut self.errors)
    }

    /// Translated display name of this source type.
    pub fn type_name(&self) -> String {
        self.translate("source_type.cloud")
    }

    pub fn type_description(&self) -> String {
        self.translate("source_type.cloud_desc")
    }

    /// Validate the configured container and resolve the public base URL.
    ///
    /// A store fault or a container missing from the public list degrades
    /// the source: the container name is cleared here and in the property
    /// store, and subsequent listings return empty. The host stays up.
    pub async fn initialize(&mut self) -> bool {
        let containers = match self.store.list_public_containers().await {
            Ok(containers) => containers,
            Err(err) => {
                error!(error = %err, "could not retrieve container list, check username and api key");
                Vec::new()
            }
        };

        if self.config.container.is_empty()
            || !containers.iter().any(|c| c == &self.config.container)
        {
            error!(container = %self.config.container, "container is not publicly enabled");
            self.config.container.clear();
            self.host.settings.set("container", "");
            return false;
        }

        let info = match self.store.get_container(&self.config.container).await {
            Ok(info) => info,
            Err(err) => {
                error!(container = %self.config.container, error = %err, "could not retrieve container");
                return false;
            }
        };

        if self.config.url_is_placeholder() {
            let resolved = format!("{}/", info.public_base_url.trim_end_matches(SEPARATOR));
            debug!(url = %resolved, "writing resolved container url");
            self.config.url = resolved.clone();
            self.host.settings.set("url", &resolved);
        }
        true
    }

    /// Raw keys under `path`, in store-native order. Store faults degrade
    /// to an empty listing; the fault is logged, not raised.
    pub async fn list_keys(&self, path: &str) -> Vec<String> {
        if self.config.container.is_empty() {
            debug!("source has no container configured, listing is empty");
            return Vec::new();
        }
        let path = normalize_key(path);
        let prefix = if path.is_empty() {
            None
        } else {
            Some(path.as_str())
        };
        match self.store.list_by_prefix(prefix).await {
            Ok(keys) => keys,
            Err(err) => {
                error!(path = %path, error = %err, "listing failed");
                Vec::new()
            }
        }
    }

    /// One level of the tree under `path`: immediate child directories
    /// first, then files, each group ascending by key.
    pub async fn list_directory(&self, path: &str) -> Vec<Entry> {
        let path = normalize_key(path);
        let keys = self.list_keys(&path).await;
        tree::build_listing(
            &path,
            keys,
            &self.config.base_url(),
            self.host.permissions.as_ref(),
            self.host.lexicon.as_ref(),
        )
    }

    /// Immediate child files of `path` for the flat browsing view, with
    /// thumbnail and preview URLs on image types.
    pub async fn list_files(&self, path: &str) -> Vec<FilePreview> {
        let path = normalize_key(path);
        let keys = self.list_keys(&path).await;
        let file_keys = tree::immediate_file_keys(&path, &keys);

        let settings = self.host.settings.as_ref();
        let base_url = self.config.base_url();
        let endpoint = settings.get_or("render_endpoint", "/connectors/system/render.php");
        let placeholder = settings.get_or("placeholder_thumb", "/manager/images/nopreview.jpg");
        let fallback_dims = (
            settings.get_u32("filemanager_image_width", 400),
            settings.get_u32("filemanager_image_height", 300),
        );
        let configured_thumb = (
            settings.get_u32("filemanager_thumb_width", 80),
            settings.get_u32("filemanager_thumb_height", 60),
        );
        let auth_token = self.host.session.user_token();
        let context_key = self.host.session.context_key();

        let mut previews = Vec::new();
        for key in file_keys {
            let name = basename(&key).to_string();
            if self.config.skip_files.iter().any(|skip| skip == &name) {
                continue;
            }
            let ext = extension(&name);
            if !self.config.allowed_file_types.is_empty()
                && !self.config.allowed_file_types.iter().any(|a| a == &ext)
            {
                continue;
            }

            let object_url = format!("{base_url}{key}");
            let mut preview = FilePreview {
                id: key.clone(),
                name,
                cls: format!("icon-{ext}"),
                ext: ext.clone(),
                url: object_url.clone(),
                relative_url: object_url.clone(),
                full_relative_url: object_url.clone(),
                pathname: object_url.clone(),
                size: 0,
                leaf: true,
                menu: vec![MenuAction::new(
                    self.translate("file_remove"),
                    "this.removeFile",
                )],
                thumb: placeholder.clone(),
                image: None,
                thumb_width: None,
                thumb_height: None,
            };

            if self.config.is_image_extension(&ext) {
                let probed = self.host.probe.dimensions(&object_url).await;
                let image_dims = thumbnail::image_dimensions(probed, fallback_dims);
                let thumb_dims = thumbnail::thumb_dimensions(configured_thumb, image_dims);
                preview.thumb = thumbnail::render_url(&RenderSpec {
                    endpoint: &endpoint,
                    src: &key,
                    width: thumb_dims.0,
                    height: thumb_dims.1,
                    format: &self.config.thumbnail_type,
                    quality: self.config.thumbnail_quality,
                    auth_token: &auth_token,
                    context_key: &context_key,
                    source_id: self.config.id,
                });
                preview.image = Some(thumbnail::render_url(&RenderSpec {
                    endpoint: &endpoint,
                    src: &key,
                    width: image_dims.0,
                    height: image_dims.1,
                    format: &self.config.thumbnail_type,
                    quality: self.config.thumbnail_quality,
                    auth_token: &auth_token,
                    context_key: &context_key,
                    source_id: self.config.id,
                }));
            } else {
                preview.thumb_width = Some(configured_thumb.0);
                preview.thumb_height = Some(configured_thumb.1);
            }
            previews.push(preview);
        }
        previews
    }

    /// Create a directory placeholder under `parent_path`.
    pub async fn create_directory(&mut self, name: &str, parent_path: &str) -> bool {
        let clean_name = sanitize_name(name);
        let clean_name = clean_name.trim_end_matches(SEPARATOR);
        if clean_name.is_empty() {
            let msg = format!("{}/", self.translate("file_folder_err_create"));
            self.add_error("name", msg);
            return false;
        }
        let new_path = normalize_key(&format!(
            "{}{clean_name}{SEPARATOR}",
            directory_prefix(parent_path)
        ));

        let probed = self.store.exists(&new_path).await;
        match probed {
            Ok(false) => {}
            Ok(true) => {
                let msg = format!("{}: /{new_path}", self.translate("file_folder_err_ae"));
                self.add_error("file", msg);
                return false;
            }
            Err(err) => {
                error!(path = %new_path, error = %err, "existence probe failed");
                let msg = format!("{}/{new_path}", self.translate("file_folder_err_create"));
                self.add_error("file", msg);
                return false;
            }
        }

        let written = self
            .store
            .write_object(&new_path, Bytes::new(), DIRECTORY_CONTENT_TYPE)
            .await;
        if let Err(err) = written {
            error!(path = %new_path, error = %err, "directory marker write failed");
            let msg = format!("{}/{new_path}", self.translate("file_folder_err_create"));
            self.add_error("name", msg);
            return false;
        }

        self.host
            .audit
            .log_action("directory_create", "", &format!("/{new_path}"));
        true
    }

    /// Remove a directory placeholder.
    ///
    /// The marker is deleted without checking that the directory is empty;
    /// child objects stay behind in the flat namespace.
    pub async fn remove_directory(&mut self, path: &str) -> bool {
        let path = normalize_key(path);
        let probed = self.store.exists(&path).await;
        match probed {
            Ok(true) => {}
            Ok(false) => {
                let msg = format!("{}: /{path}", self.translate("file_folder_err_ns"));
                self.add_error("file", msg);
                return false;
            }
            Err(err) => {
                error!(path = %path, error = %err, "existence probe failed");
                let msg = format!("{}: /{path}", self.translate("file_folder_err_ns"));
                self.add_error("file", msg);
                return false;
            }
        }

        let deleted = self.store.delete_object(&path).await;
        if let Err(err) = deleted {
            error!(path = %path, error = %err, "directory marker delete failed");
            let msg = format!("{}: /{path}", self.translate("file_folder_err_remove"));
            self.add_error("file", msg);
            return false;
        }

        self.host.audit.log_action("directory_remove", "", &path);
        true
    }

    /// Delete a single object.
    pub async fn remove_object(&mut self, path: &str) -> bool {
        let path = normalize_key(path);
        let probed = self.store.exists(&path).await;
        match probed {
            Ok(true) => {}
            Ok(false) => {
                let msg = format!("{}: {path}", self.translate("file_err_ns"));
                self.add_error("file", msg);
                return false;
            }
            Err(err) => {
                error!(path = %path, error = %err, "existence probe failed");
                let msg = format!("{}: {path}", self.translate("file_err_ns"));
                self.add_error("file", msg);
                return false;
            }
        }

        let deleted = self.store.delete_object(&path).await;
        if let Err(err) = deleted {
            error!(path = %path, error = %err, "object delete failed");
            let msg = format!("{}: {path}", self.translate("file_err_remove"));
            self.add_error("file", msg);
            return false;
        }

        self.host.audit.log_action("file_remove", "", &path);
        true
    }

    /// Rename an object in place: the new key keeps the old parent
    /// directory and takes the sanitized new name.
    pub async fn rename_object(&mut self, old_path: &str, new_name: &str) -> bool {
        let old_path = normalize_key(old_path);
        let probed = self.store.exists(&old_path).await;
        match probed {
            Ok(true) => {}
            Ok(false) => {
                let msg = format!("{}: /{old_path}", self.translate("file_err_ns"));
                self.add_error("file", msg);
                return false;
            }
            Err(err) => {
                error!(path = %old_path, error = %err, "existence probe failed");
                let msg = format!("{}: /{old_path}", self.translate("file_err_ns"));
                self.add_error("file", msg);
                return false;
            }
        }

        let new_path = match parent_dir(&old_path) {
            Some(dir) => format!("{dir}{SEPARATOR}{}", sanitize_name(new_name)),
            None => sanitize_name(new_name),
        };

        let transferred = self.transfer_object(&old_path, &new_path).await;
        match transferred {
            Ok(()) => {}
            Err(SourceError::Inconsistent { from, to }) => {
                let msg = self.translate_with("file_err_move_incomplete", &[("from", from.as_str()), ("to", to.as_str())]);
                self.add_error("file", msg);
                return false;
            }
            Err(err) => {
                error!(from = %old_path, to = %new_path, error = %err, "rename failed");
                let msg = format!("{}: /{old_path}", self.translate("file_folder_err_rename"));
                self.add_error("file", msg);
                return false;
            }
        }

        self.host
            .audit
            .log_action("file_rename", "", &format!("/{old_path}"));
        true
    }

    /// Move an object into another directory, keeping its basename.
    /// Directory sources are rejected before any store call.
    pub async fn move_object(&mut self, from: &str, to: &str) -> bool {
        let from = normalize_key(from);
        let to = normalize_key(to);

        if is_directory_key(&from) {
            let msg = self.translate_with("file_err_move_folder", &[("from", from.as_str())]);
            self.add_error("file", msg);
            return false;
        }

        let probed = self.store.exists(&from).await;
        match probed {
            Ok(true) => {}
            Ok(false) => {
                let msg = format!("{}: {from}", self.translate("file_err_ns"));
                self.add_error("file", msg);
                return false;
            }
            Err(err) => {
                error!(path = %from, error = %err, "existence probe failed");
                let msg = format!("{}: {from}", self.translate("file_err_ns"));
                self.add_error("file", msg);
                return false;
            }
        }

        let to_path = if to.is_empty() {
            basename(&from).to_string()
        } else {
            format!("{}{SEPARATOR}{}", to.trim_end_matches(SEPARATOR), basename(&from))
        };

        let transferred = self.transfer_object(&from, &to_path).await;
        match transferred {
            Ok(()) => true,
            Err(SourceError::Inconsistent { from, to }) => {
                let msg = self.translate_with("file_err_move_incomplete", &[("from", from.as_str()), ("to", to.as_str())]);
                self.add_error("file", msg);
                false
            }
            Err(err) => {
                error!(from = %from, to = %to_path, error = %err, "move failed");
                let msg = format!(
                    "{}: {from} -> {to_path}",
                    self.translate("file_folder_err_rename")
                );
                self.add_error("file", msg);
                false
            }
        }
    }

    /// Upload a batch of staged items into `directory`.
    ///
    /// Items are validated and written independently; one failure never
    /// aborts the batch. The upload event fires once with the full report,
    /// and one audit entry is written regardless of individual outcomes.
    pub async fn upload_objects(&mut self, directory: &str, items: Vec<UploadItem>) -> bool {
        let directory = {
            let d = directory_prefix(directory);
            if d == "." { String::new() } else { d }
        };
        let allowed = self.merged_upload_types();
        let max_size = self.host.settings.get_u64("upload_maxsize", 1_048_576);

        let mut files = Vec::with_capacity(items.len());
        for item in &items {
            if item.transport_error.is_some() || item.name.is_empty() {
                files.push(UploadItemReport {
                    name: item.name.clone(),
                    outcome: UploadOutcome::Skipped,
                });
                continue;
            }

            if let Err(err) = self.validate_upload(item, &allowed, max_size) {
                let msg = err.to_string();
                self.add_error("path", msg.clone());
                files.push(UploadItemReport {
                    name: item.name.clone(),
                    outcome: UploadOutcome::Rejected { reason: msg },
                });
                continue;
            }

            let key = format!("{directory}{}", sanitize_name(&item.name));
            let content_type = item
                .content_type
                .as_deref()
                .unwrap_or("application/octet-stream");
            let written = self
                .store
                .write_object(&key, item.content.clone(), content_type)
                .await;
            match written {
                Ok(()) => {
                    debug!(key = %key, size = item.size, "uploaded object");
                    files.push(UploadItemReport {
                        name: item.name.clone(),
                        outcome: UploadOutcome::Written { key },
                    });
                }
                Err(err) => {
                    error!(key = %key, error = %err, "upload write failed");
                    let msg = self.translate("file_err_upload");
                    self.add_error("path", msg.clone());
                    files.push(UploadItemReport {
                        name: item.name.clone(),
                        outcome: UploadOutcome::Rejected { reason: msg },
                    });
                }
            }
        }

        let report = UploadReport {
            directory: directory.clone(),
            files,
        };
        self.host.events.emit(
            UPLOAD_EVENT,
            serde_json::to_value(&report).unwrap_or_default(),
        );
        self.host.audit.log_action("file_upload", "", &directory);
        true
    }

    /// Read one object's payload plus the metadata the store reports.
    pub async fn object_contents(&self, path: &str) -> SourceResult<ObjectContents> {
        let path = normalize_key(path);
        let stat = self
            .store
            .stat(&path)
            .await?
            .ok_or_else(|| SourceError::NotFound { path: path.clone() })?;
        let content = self.store.read_object(&path).await?;
        let name = basename(&path).to_string();
        let ext = extension(&name);
        Ok(ObjectContents {
            name: path.clone(),
            basename: name,
            size: stat.size,
            last_modified: stat.last_modified,
            image: self.config.is_image_extension(&ext),
            content,
            path,
        })
    }

    /// Public base URL of the container.
    pub fn base_url(&self) -> String {
        self.config.base_url()
    }

    /// Public URL of one object.
    pub fn object_url(&self, key: &str) -> String {
        format!("{}{}", self.config.base_url(), normalize_key(key))
    }

    /// Prefix a bare key with the base URL unless it is already absolute.
    pub fn prepare_thumb_src(&self, src: &str) -> String {
        let base = self.config.base_url();
        if src.starts_with(&base) {
            src.to_string()
        } else {
            format!("{base}{}", src.trim_start_matches(SEPARATOR))
        }
    }

    /// Check one upload item against the merged extension allow-list and
    /// the size ceiling.
    fn validate_upload(
        &self,
        item: &UploadItem,
        allowed: &BTreeSet<String>,
        max_size: u64,
    ) -> SourceResult<()> {
        let ext = extension(&item.name);
        if ext.is_empty() || !allowed.contains(&ext) {
            return Err(SourceError::Validation {
                reason: self.translate_with("file_err_ext_not_allowed", &[("ext", ext.as_str())]),
            });
        }
        if item.size > max_size {
            let size = item.size.to_string();
            let limit = max_size.to_string();
            return Err(SourceError::Validation {
                reason: self.translate_with(
                    "file_err_too_large",
                    &[("size", size.as_str()), ("allowed", limit.as_str())],
                ),
            });
        }
        Ok(())
    }

    /// Copy `from` to `to`, then delete `from`. A delete failure after a
    /// successful copy leaves both keys in the container and is surfaced
    /// as the inconsistent case, not retried.
    async fn transfer_object(&self, from: &str, to: &str) -> SourceResult<()> {
        self.store.copy_object(from, to).await?;
        if let Err(err) = self.store.delete_object(from).await {
            warn!(from = %from, to = %to, error = %err, "copy succeeded but source delete failed");
            return Err(SourceError::Inconsistent {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(())
    }

    /// Union of the host's upload extension categories, lower-cased.
    fn merged_upload_types(&self) -> BTreeSet<String> {
        let mut merged = BTreeSet::new();
        for setting in ["upload_files", "upload_images", "upload_media", "upload_flash"] {
            if let Some(raw) = self.host.settings.get(setting) {
                merged.extend(
                    raw.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(|s| s.to_ascii_lowercase()),
                );
            }
        }
        merged
    }

    fn translate(&self, key: &str) -> String {
        self.host.lexicon.translate(key, &[])
    }

    fn translate_with(&self, key: &str, params: &[(&str, &str)]) -> String {
        self.host.lexicon.translate(key, params)
    }

    fn add_error(&mut self, field: &str, message: String) {
        self.errors.push(FieldError::new(field, message));
    }
}

/// Normalize a directory path into a key prefix: no leading separator, one
/// trailing separator unless root.
fn directory_prefix(path: &str) -> String {
    let path = normalize_key(path);
    if path.is_empty() || path == "." || path.ends_with(SEPARATOR) {
        path
    } else {
        format!("{path}{SEPARATOR}")
    }
}
