//! Flat file view items with thumbnail metadata.

use serde::Serialize;

use super::entry::MenuAction;

/// One file in the flat (non-tree) browsing view, enriched with thumbnail
/// and preview URLs for image types.
#[derive(Debug, Clone, Serialize)]
pub struct FilePreview {
    /// Full key in the flat namespace.
    pub id: String,
    pub name: String,
    pub cls: String,
    pub ext: String,
    pub url: String,
    #[serde(rename = "relativeUrl")]
    pub relative_url: String,
    #[serde(rename = "fullRelativeUrl")]
    pub full_relative_url: String,
    pub pathname: String,
    /// Size is not part of the flat listing; zero unless the caller stats
    /// the object separately.
    pub size: u64,
    pub leaf: bool,
    pub menu: Vec<MenuAction>,
    /// Thumbnail URL for images, placeholder path otherwise.
    pub thumb: String,
    /// Larger preview URL, images only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "thumbWidth", skip_serializing_if = "Option::is_none")]
    pub thumb_width: Option<u32>,
    #[serde(rename = "thumbHeight", skip_serializing_if = "Option::is_none")]
    pub thumb_height: Option<u32>,
}
