//! Tree entries materialized from the flat listing.

use serde::{Serialize, Serializer};

/// Node type in the directory tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryKind {
    #[serde(rename = "dir")]
    Directory,
    #[serde(rename = "file")]
    File,
}

/// One action in a context menu, dispatched by the manager UI through its
/// fixed handler name.
#[derive(Debug, Clone, Serialize)]
pub struct MenuAction {
    pub text: String,
    pub handler: String,
}

impl MenuAction {
    pub fn new(text: impl Into<String>, handler: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            handler: handler.into(),
        }
    }
}

/// Context-menu entry; separators serialize as the literal string `"-"`.
#[derive(Debug, Clone)]
pub enum MenuEntry {
    Action(MenuAction),
    Separator,
}

impl Serialize for MenuEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MenuEntry::Action(action) => action.serialize(serializer),
            MenuEntry::Separator => serializer.serialize_str("-"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Menu {
    pub items: Vec<MenuEntry>,
}

/// A single file or directory node of the virtual tree, shaped for the
/// manager's tree component.
#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    /// Full key in the flat namespace; doubles as the node id.
    pub id: String,
    /// Basename shown as the node label.
    pub text: String,
    /// Icon class derived from the extension.
    pub cls: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub leaf: bool,
    pub path: String,
    #[serde(rename = "pathRelative")]
    pub path_relative: String,
    /// Public URL, files only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub menu: Menu,
}

impl Entry {
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_separator_serializes_as_dash() {
        let menu = Menu {
            items: vec![
                MenuEntry::Action(MenuAction::new("Rename", "this.renameFile")),
                MenuEntry::Separator,
            ],
        };
        let value = serde_json::to_value(&menu).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "items": [
                    {"text": "Rename", "handler": "this.renameFile"},
                    "-"
                ]
            })
        );
    }

    #[test]
    fn entry_uses_wire_field_names() {
        let entry = Entry {
            id: "a/c/".into(),
            text: "c".into(),
            cls: "icon-".into(),
            kind: EntryKind::Directory,
            leaf: false,
            path: "a/c/".into(),
            path_relative: "a/c/".into(),
            url: None,
            menu: Menu::default(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "dir");
        assert_eq!(value["pathRelative"], "a/c/");
        assert!(value.get("url").is_none());
    }
}
