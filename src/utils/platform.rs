//! Path string handling that does not depend on the host platform
//!
//! Dependency roots come from build machines of any OS and are matched as
//! text inside generated files, so they are handled as strings here rather
//! than as [`std::path::Path`] values, whose parsing follows the host.

/// Converts every backslash to a forward slash.
///
/// Generated CMake files on Windows usually carry forward-slash paths even
/// when the package manager reports backslash roots.
#[must_use]
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Normalizes a dependency root for matching.
///
/// Separators become forward slashes and trailing separators are dropped,
/// except for a bare filesystem root (`/`), which is kept as is.
#[must_use]
pub fn normalize_root(root: &str) -> String {
    let normalized = normalize_separators(root.trim());
    let trimmed = normalized.trim_end_matches('/');
    if trimmed.is_empty() && !normalized.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Returns true for absolute paths in POSIX, drive-letter or UNC form.
///
/// Expects a root already passed through [`normalize_root`].
#[must_use]
pub fn is_absolute_root(root: &str) -> bool {
    if root.starts_with('/') {
        return true;
    }

    let bytes = root.as_bytes();
    bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/'
}

/// Returns true if `c` can be part of a path component.
///
/// Used to decide whether a textual match of a root is a whole path or the
/// start of a longer, unrelated one (`/opt/zlib` inside `/opt/zlib2`).
#[must_use]
pub const fn is_component_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+' | '~' | '@')
}
