//! Discovery of generated build-description files.
//!
//! The relocator never guesses which files to touch: it walks the installed
//! package tree and keeps the files whose path, relative to the package root,
//! matches a glob. The default glob is [`DEFAULT_TARGET_PATTERN`](crate::constants::DEFAULT_TARGET_PATTERN).
//!
//! # Pattern Syntax
//!
//! - `*` matches any sequence of characters within a single path component
//! - `**` matches any sequence of path components (recursive matching)
//! - `?` matches any single character
//! - `[abc]` / `[a-z]` match a character set or range
//!
//! Relative paths are matched with `/` separators on every platform, so the
//! same pattern works for a package built on Windows.
//!
//! # Examples
//!
//! ```rust,no_run
//! use vtkpkg::pattern::PatternMatcher;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let matcher = PatternMatcher::new("lib/cmake/**/*.cmake")?;
//! for file in matcher.find_matches(Path::new("package"))? {
//!     println!("{}", file.display());
//! }
//! # Ok(())
//! # }
//! ```

use crate::core::VtkpkgError;
use crate::core::file_error::{FileOperation, FileOperationError};
use crate::utils::platform::normalize_separators;
use anyhow::Result;
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Compiled glob for target file discovery.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    pattern: Pattern,
    original_pattern: String,
}

impl PatternMatcher {
    /// Compiles `pattern_str`.
    ///
    /// # Errors
    ///
    /// Returns [`VtkpkgError::InvalidPattern`] for malformed globs.
    pub fn new(pattern_str: &str) -> Result<Self> {
        let pattern = Pattern::new(pattern_str).map_err(|e| VtkpkgError::InvalidPattern {
            pattern: pattern_str.to_string(),
            reason: e.msg.to_string(),
        })?;

        Ok(Self {
            pattern,
            original_pattern: pattern_str.to_string(),
        })
    }

    /// Finds all regular files under `base_path` matching the pattern.
    ///
    /// Symlinks are not followed. Returned paths are absolute (joined onto
    /// `base_path`) and sorted, so every run processes files in the same order.
    ///
    /// # Errors
    ///
    /// Any traversal error is fatal: a file that cannot be listed is a file
    /// that cannot be relocated.
    pub fn find_matches(&self, base_path: &Path) -> Result<Vec<PathBuf>> {
        debug!("Searching for pattern '{}' in {}", self.original_pattern, base_path.display());

        let mut matches = Vec::new();

        for entry in WalkDir::new(base_path).follow_links(false) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(base_path).to_path_buf();
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
                FileOperationError::new(
                    FileOperation::Walk,
                    path,
                    "discovering generated build files",
                    source,
                )
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if let Ok(relative_path) = path.strip_prefix(base_path) {
                trace!("Checking path: {}", relative_path.display());

                if self.matches(relative_path) {
                    debug!("Found match: {}", relative_path.display());
                    matches.push(path.to_path_buf());
                }
            }
        }

        matches.sort();
        debug!("Found {} matches for pattern '{}'", matches.len(), self.original_pattern);
        Ok(matches)
    }

    /// Checks a relative path against the pattern without touching the filesystem.
    pub fn matches(&self, path: &Path) -> bool {
        let path_str = normalize_separators(&path.to_string_lossy());
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };
        self.pattern.matches_with(&path_str, options)
    }

    /// The pattern as given to [`PatternMatcher::new`].
    pub fn pattern(&self) -> &str {
        &self.original_pattern
    }
}
