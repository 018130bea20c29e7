//! Conversion of a flat key listing into one level of the virtual tree.
//!
//! The container reports every key under a prefix, grandchildren included.
//! The builder classifies each key by the trailing-separator convention,
//! keeps immediate children only, and emits entries in the order the tree
//! component expects: directories first, both groups ascending by full key.

use std::collections::BTreeMap;

use crate::host::{Lexicon, PermissionOracle};
use crate::models::entry::{Entry, EntryKind, Menu, MenuAction, MenuEntry};
use crate::path::{basename, extension, is_directory_key, separator_count};

/// Part of `key` below the listed `path`.
fn relative<'a>(path: &str, key: &'a str) -> &'a str {
    key.strip_prefix(path).unwrap_or(key)
}

/// An immediate child directory of `path`: a placeholder key exactly one
/// level down.
pub fn is_immediate_child_dir(path: &str, key: &str) -> bool {
    is_directory_key(key) && key != path && separator_count(relative(path, key)) <= 1
}

/// An immediate child file of `path`: a non-placeholder key with no further
/// separators below the prefix.
pub fn is_immediate_child_file(path: &str, key: &str) -> bool {
    !is_directory_key(key) && separator_count(relative(path, key)) == 0
}

/// Immediate-child file keys of `path`, ascending by key.
pub fn immediate_file_keys(path: &str, keys: &[String]) -> Vec<String> {
    let mut files: Vec<String> = keys
        .iter()
        .filter(|key| is_immediate_child_file(path, key))
        .cloned()
        .collect();
    files.sort();
    files
}

/// Build the one-level listing of `path` from the raw key set.
///
/// The key equal to `path` itself (the directory's own marker) is dropped,
/// depth filtering keeps immediate children only, and duplicate keys
/// collapse. Ordering is a contract: all directories precede all files,
/// each group ascending lexicographically by full key.
pub fn build_listing(
    path: &str,
    keys: Vec<String>,
    base_url: &str,
    permissions: &dyn PermissionOracle,
    lexicon: &dyn Lexicon,
) -> Vec<Entry> {
    let mut directories: BTreeMap<String, Entry> = BTreeMap::new();
    let mut files: BTreeMap<String, Entry> = BTreeMap::new();

    for key in keys {
        if key == path {
            continue;
        }
        let name = basename(&key).to_string();
        let ext = extension(&name);

        if is_immediate_child_dir(path, &key) {
            let menu = context_menu(EntryKind::Directory, permissions, lexicon);
            directories.insert(
                key.clone(),
                Entry {
                    id: key.clone(),
                    text: name,
                    cls: format!("icon-{ext}"),
                    kind: EntryKind::Directory,
                    leaf: false,
                    path: key.clone(),
                    path_relative: key.clone(),
                    url: None,
                    menu,
                },
            );
        } else if is_immediate_child_file(path, &key) {
            let menu = context_menu(EntryKind::File, permissions, lexicon);
            files.insert(
                key.clone(),
                Entry {
                    id: key.clone(),
                    text: name,
                    cls: format!("icon-{ext}"),
                    kind: EntryKind::File,
                    leaf: true,
                    path: key.clone(),
                    path_relative: key.clone(),
                    url: Some(format!("{base_url}{key}")),
                    menu,
                },
            );
        }
    }

    directories
        .into_values()
        .chain(files.into_values())
        .collect()
}

/// Context menu for a tree node, gated on the caller's permissions.
///
/// Item order matches what the manager UI renders; a separator goes in
/// front of the remove action only when something precedes it.
pub fn context_menu(
    kind: EntryKind,
    permissions: &dyn PermissionOracle,
    lexicon: &dyn Lexicon,
) -> Menu {
    let mut items = Vec::new();
    let action =
        |key: &str, handler: &str| MenuEntry::Action(MenuAction::new(lexicon.translate(key, &[]), handler));

    match kind {
        EntryKind::File => {
            if permissions.has_permission("file_update") {
                items.push(action("rename", "this.renameFile"));
            }
            if permissions.has_permission("file_view") {
                items.push(action("file_download", "this.downloadFile"));
            }
            if permissions.has_permission("file_remove") {
                if !items.is_empty() {
                    items.push(MenuEntry::Separator);
                }
                items.push(action("file_remove", "this.removeFile"));
            }
        }
        EntryKind::Directory => {
            if permissions.has_permission("directory_create") {
                items.push(action("file_folder_create_here", "this.createDirectory"));
            }
            items.push(action("directory_refresh", "this.refreshActiveNode"));
            if permissions.has_permission("file_upload") {
                items.push(MenuEntry::Separator);
                items.push(action("upload_files", "this.uploadFiles"));
            }
            if permissions.has_permission("directory_remove") {
                items.push(MenuEntry::Separator);
                items.push(action("file_folder_remove", "this.removeDirectory"));
            }
        }
    }

    Menu { items }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Caps(HashSet<String>);

    impl Caps {
        fn all() -> Self {
            Self(
                [
                    "file_update",
                    "file_view",
                    "file_remove",
                    "directory_create",
                    "file_upload",
                    "directory_remove",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            )
        }

        fn only(actions: &[&str]) -> Self {
            Self(actions.iter().map(|s| s.to_string()).collect())
        }
    }

    impl PermissionOracle for Caps {
        fn has_permission(&self, action: &str) -> bool {
            self.0.contains(action)
        }
    }

    /// Echoes the lexicon key back, so tests can assert on keys.
    struct EchoLexicon;

    impl Lexicon for EchoLexicon {
        fn translate(&self, key: &str, _params: &[(&str, &str)]) -> String {
            key.to_string()
        }
    }

    fn keys(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn listing_keeps_immediate_children_only() {
        let entries = build_listing(
            "a/",
            keys(&["a/", "a/b.jpg", "a/c/", "a/c/d.jpg"]),
            "http://cdn.example.net/",
            &Caps::all(),
            &EchoLexicon,
        );
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a/c/", "a/b.jpg"]);
        assert_eq!(entries[0].kind, EntryKind::Directory);
        assert_eq!(entries[1].kind, EntryKind::File);
    }

    #[test]
    fn root_listing_excludes_everything_nested() {
        let entries = build_listing(
            "",
            keys(&["z.txt", "a/", "a/b.jpg", "a/c/", "b/"]),
            "http://cdn.example.net/",
            &Caps::all(),
            &EchoLexicon,
        );
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a/", "b/", "z.txt"]);
    }

    #[test]
    fn directories_precede_files_regardless_of_input_order() {
        let entries = build_listing(
            "",
            keys(&["b.txt", "a.txt", "z/", "m/"]),
            "http://cdn.example.net/",
            &Caps::all(),
            &EchoLexicon,
        );
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["m/", "z/", "a.txt", "b.txt"]);
    }

    #[test]
    fn duplicate_keys_collapse() {
        let entries = build_listing(
            "",
            keys(&["a.txt", "a.txt"]),
            "http://cdn.example.net/",
            &Caps::all(),
            &EchoLexicon,
        );
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn file_entries_carry_public_urls_and_icons() {
        let entries = build_listing(
            "a/",
            keys(&["a/photo.JPG"]),
            "http://cdn.example.net/",
            &Caps::all(),
            &EchoLexicon,
        );
        assert_eq!(
            entries[0].url.as_deref(),
            Some("http://cdn.example.net/a/photo.JPG")
        );
        assert_eq!(entries[0].cls, "icon-jpg");
        assert_eq!(entries[0].text, "photo.JPG");
    }

    #[test]
    fn file_menu_with_view_only_is_just_download() {
        let menu = context_menu(EntryKind::File, &Caps::only(&["file_view"]), &EchoLexicon);
        assert_eq!(menu.items.len(), 1);
        match &menu.items[0] {
            MenuEntry::Action(action) => {
                assert_eq!(action.text, "file_download");
                assert_eq!(action.handler, "this.downloadFile");
            }
            MenuEntry::Separator => panic!("expected an action"),
        }
    }

    #[test]
    fn file_menu_with_all_permissions_orders_rename_download_sep_remove() {
        let menu = context_menu(EntryKind::File, &Caps::all(), &EchoLexicon);
        let shape: Vec<String> = menu
            .items
            .iter()
            .map(|item| match item {
                MenuEntry::Action(a) => a.handler.clone(),
                MenuEntry::Separator => "-".to_string(),
            })
            .collect();
        assert_eq!(
            shape,
            vec![
                "this.renameFile",
                "this.downloadFile",
                "-",
                "this.removeFile"
            ]
        );
    }

    #[test]
    fn remove_only_file_menu_has_no_leading_separator() {
        let menu = context_menu(EntryKind::File, &Caps::only(&["file_remove"]), &EchoLexicon);
        assert_eq!(menu.items.len(), 1);
        assert!(matches!(&menu.items[0], MenuEntry::Action(a) if a.handler == "this.removeFile"));
    }

    #[test]
    fn directory_menu_always_contains_refresh() {
        let menu = context_menu(EntryKind::Directory, &Caps::only(&[]), &EchoLexicon);
        assert_eq!(menu.items.len(), 1);
        assert!(
            matches!(&menu.items[0], MenuEntry::Action(a) if a.handler == "this.refreshActiveNode")
        );

        let full = context_menu(EntryKind::Directory, &Caps::all(), &EchoLexicon);
        let shape: Vec<String> = full
            .items
            .iter()
            .map(|item| match item {
                MenuEntry::Action(a) => a.handler.clone(),
                MenuEntry::Separator => "-".to_string(),
            })
            .collect();
        assert_eq!(
            shape,
            vec![
                "this.createDirectory",
                "this.refreshActiveNode",
                "-",
                "this.uploadFiles",
                "-",
                "this.removeDirectory"
            ]
        );
    }

    #[test]
    fn immediate_file_keys_sorts_and_filters() {
        let all = keys(&["a/z.png", "a/b.png", "a/c/", "a/c/deep.png", "a/"]);
        assert_eq!(immediate_file_keys("a/", &all), vec!["a/b.png", "a/z.png"]);
    }
}
