//! Key and path helpers for the flat namespace.
//!
//! The container has no native directory structure; a trailing separator
//! marks a zero-byte directory placeholder. Every store call works on keys
//! produced by these helpers, so the rules for leading separators and
//! whitespace live here and nowhere else.

/// Separator character simulating directory levels inside object keys.
pub const SEPARATOR: char = '/';

/// Canonicalize a raw path into a store key. The store rejects
/// absolute-looking keys, so leading separators are stripped; `/` by itself
/// addresses the container root and normalizes to the empty string.
pub fn normalize_key(raw: &str) -> String {
    raw.trim_start_matches(SEPARATOR).to_string()
}

/// Make a user-supplied filename safe as a key segment by replacing
/// whitespace with `-`.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect()
}

/// Whether a key denotes a directory placeholder.
pub fn is_directory_key(key: &str) -> bool {
    key.ends_with(SEPARATOR)
}

/// Last path segment of a key. Directory keys yield their own name, not an
/// empty string: `a/c/` → `c`.
pub fn basename(key: &str) -> &str {
    let trimmed = key.trim_end_matches(SEPARATOR);
    trimmed.rsplit(SEPARATOR).next().unwrap_or(trimmed)
}

/// Directory portion of a key, without a trailing separator. `None` for
/// top-level keys.
pub fn parent_dir(key: &str) -> Option<&str> {
    let trimmed = key.trim_end_matches(SEPARATOR);
    trimmed.rfind(SEPARATOR).map(|idx| &trimmed[..idx])
}

/// Lower-cased extension of a filename, empty when there is none. Dotfiles
/// such as `.gitignore` carry no extension.
pub fn extension(name: &str) -> String {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => name[idx + 1..].to_ascii_lowercase(),
        _ => String::new(),
    }
}

/// Number of separators in a path fragment.
pub fn separator_count(fragment: &str) -> usize {
    fragment.matches(SEPARATOR).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_leading_separators() {
        assert_eq!(normalize_key("/a/b.jpg"), "a/b.jpg");
        assert_eq!(normalize_key("a/b.jpg"), "a/b.jpg");
        assert_eq!(normalize_key("/"), "");
        assert_eq!(normalize_key(""), "");
    }

    #[test]
    fn sanitize_replaces_whitespace_with_dashes() {
        assert_eq!(sanitize_name("my photo.jpg"), "my-photo.jpg");
        assert_eq!(sanitize_name("a\tb c"), "a-b-c");
        assert_eq!(sanitize_name("plain.png"), "plain.png");
    }

    #[test]
    fn basename_handles_files_and_directory_markers() {
        assert_eq!(basename("a/b/c.jpg"), "c.jpg");
        assert_eq!(basename("a/c/"), "c");
        assert_eq!(basename("top.txt"), "top.txt");
        assert_eq!(basename(""), "");
    }

    #[test]
    fn parent_dir_of_nested_and_top_level_keys() {
        assert_eq!(parent_dir("a/b/c.jpg"), Some("a/b"));
        assert_eq!(parent_dir("a/c/"), Some("a"));
        assert_eq!(parent_dir("top.txt"), None);
    }

    #[test]
    fn extension_is_lower_cased_and_absent_for_dotfiles() {
        assert_eq!(extension("photo.JPG"), "jpg");
        assert_eq!(extension("archive.tar.gz"), "gz");
        assert_eq!(extension("Makefile"), "");
        assert_eq!(extension(".DS_Store"), "");
        assert_eq!(extension("trailing."), "");
    }

    #[test]
    fn separator_count_counts_all_levels() {
        assert_eq!(separator_count("a/b/c"), 2);
        assert_eq!(separator_count("c/"), 1);
        assert_eq!(separator_count("plain"), 0);
    }
}
