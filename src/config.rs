//! Source configuration.
//!
//! Each source instance owns one resolved [`SourceConfig`]; nothing is held
//! in process-wide state, so several sources pointing at different
//! containers can coexist in one process without sharing credentials.

use serde::{Deserialize, Serialize};

use crate::host::SettingStore;

/// Placeholder the host seeds the `url` property with before a container
/// endpoint has been resolved.
pub const URL_PLACEHOLDER: &str = "http://";

const DEFAULT_IMAGE_EXTENSIONS: &str = "jpg,jpeg,png,gif";
const DEFAULT_SKIP_FILES: &str = ".svn,.git,_notes,nbproject,.idea,.DS_Store";

/// Per-source settings resolved from the host's property store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Numeric source id, carried in render URLs so the thumbnail service
    /// can resolve the right container.
    pub id: u32,
    pub username: String,
    pub api_key: String,
    /// Route store traffic over the provider's internal network.
    pub servicenet: bool,
    pub container: String,
    /// Public base URL of the container. Re-derived from the container's
    /// endpoint when left at the placeholder.
    pub url: String,
    /// Extensions rendered with thumbnails instead of a placeholder icon.
    pub image_extensions: Vec<String>,
    /// When non-empty, only these extensions appear in file listings.
    pub allowed_file_types: Vec<String>,
    /// Output format for rendered thumbnails.
    pub thumbnail_type: String,
    pub thumbnail_quality: u32,
    /// Filenames hidden from the flat file view.
    pub skip_files: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            id: 0,
            username: String::new(),
            api_key: String::new(),
            servicenet: false,
            container: String::new(),
            url: URL_PLACEHOLDER.to_string(),
            image_extensions: csv_list(DEFAULT_IMAGE_EXTENSIONS),
            allowed_file_types: Vec::new(),
            thumbnail_type: "png".to_string(),
            thumbnail_quality: 90,
            skip_files: csv_list(DEFAULT_SKIP_FILES),
        }
    }
}

impl SourceConfig {
    /// Resolve a configuration from the host's property store, falling back
    /// to the defaults for anything unset.
    pub fn from_settings(id: u32, settings: &dyn SettingStore) -> Self {
        let defaults = Self::default();
        Self {
            id,
            username: settings.get_or("username", ""),
            api_key: settings.get_or("api_key", ""),
            servicenet: settings.get_bool("servicenet", false),
            container: settings.get_or("container", ""),
            url: settings.get_or("url", URL_PLACEHOLDER),
            image_extensions: csv_list(&settings.get_or("imageExtensions", DEFAULT_IMAGE_EXTENSIONS)),
            allowed_file_types: csv_list(&settings.get_or("allowedFileTypes", "")),
            thumbnail_type: settings.get_or("thumbnailType", "png"),
            thumbnail_quality: settings.get_u32("thumbnailQuality", defaults.thumbnail_quality),
            skip_files: csv_list(&settings.get_or("skipFiles", DEFAULT_SKIP_FILES)),
        }
    }

    /// Container base URL with exactly one trailing separator.
    pub fn base_url(&self) -> String {
        format!("{}/", self.url.trim_end_matches('/'))
    }

    pub fn is_image_extension(&self, ext: &str) -> bool {
        self.image_extensions.iter().any(|e| e == ext)
    }

    /// Whether the configured URL still needs to be derived from the
    /// container endpoint (empty, or the untouched `http://` placeholder).
    pub fn url_is_placeholder(&self) -> bool {
        let trimmed = self.url.trim();
        let rest = match trimmed.get(..URL_PLACEHOLDER.len()) {
            Some(scheme) if scheme.eq_ignore_ascii_case(URL_PLACEHOLDER) => {
                &trimmed[URL_PLACEHOLDER.len()..]
            }
            _ => trimmed,
        };
        rest.trim().is_empty()
    }
}

/// Split a comma-separated property value, dropping empty segments.
fn csv_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MapSettings(Mutex<HashMap<String, String>>);

    impl MapSettings {
        fn new(pairs: &[(&str, &str)]) -> Self {
            Self(Mutex::new(
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ))
        }
    }

    impl SettingStore for MapSettings {
        fn get(&self, name: &str) -> Option<String> {
            self.0.lock().unwrap().get(name).cloned()
        }

        fn set(&self, name: &str, value: &str) {
            self.0
                .lock()
                .unwrap()
                .insert(name.to_string(), value.to_string());
        }
    }

    #[test]
    fn defaults_match_the_stock_property_set() {
        let cfg = SourceConfig::default();
        assert_eq!(cfg.url, "http://");
        assert_eq!(cfg.image_extensions, vec!["jpg", "jpeg", "png", "gif"]);
        assert_eq!(cfg.thumbnail_type, "png");
        assert_eq!(cfg.thumbnail_quality, 90);
        assert!(cfg.allowed_file_types.is_empty());
        assert!(cfg.skip_files.contains(&".DS_Store".to_string()));
    }

    #[test]
    fn from_settings_overrides_and_splits_lists() {
        let settings = MapSettings::new(&[
            ("container", "assets"),
            ("imageExtensions", "webp, png"),
            ("thumbnailQuality", "75"),
            ("allowedFileTypes", "jpg,png"),
        ]);
        let cfg = SourceConfig::from_settings(3, &settings);
        assert_eq!(cfg.id, 3);
        assert_eq!(cfg.container, "assets");
        assert_eq!(cfg.image_extensions, vec!["webp", "png"]);
        assert_eq!(cfg.thumbnail_quality, 75);
        assert_eq!(cfg.allowed_file_types, vec!["jpg", "png"]);
    }

    #[test]
    fn placeholder_url_detection() {
        let mut cfg = SourceConfig::default();
        assert!(cfg.url_is_placeholder());
        cfg.url = String::new();
        assert!(cfg.url_is_placeholder());
        cfg.url = "  HTTP://  ".to_string();
        assert!(cfg.url_is_placeholder());
        cfg.url = "http://cdn.example.net/".to_string();
        assert!(!cfg.url_is_placeholder());
    }

    #[test]
    fn base_url_always_ends_with_one_separator() {
        let mut cfg = SourceConfig::default();
        cfg.url = "http://cdn.example.net".to_string();
        assert_eq!(cfg.base_url(), "http://cdn.example.net/");
        cfg.url = "http://cdn.example.net//".to_string();
        assert_eq!(cfg.base_url(), "http://cdn.example.net/");
    }
}
