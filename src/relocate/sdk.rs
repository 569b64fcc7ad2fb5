//! Removal of leaked macOS SDK include paths.
//!
//! When VTK is configured with Xcode, CMake records the SDK's
//! `usr/include` directory in `INTERFACE_INCLUDE_DIRECTORIES`. That path only
//! exists on the build machine and has no placeholder equivalent: the
//! consumer's own toolchain supplies its SDK. The entry is therefore deleted,
//! together with its list separator, instead of being tokenized.
//!
//! The SDK version differs between build machines, so it is matched with a
//! numeric wildcard (`MacOSX<N>(.<N>)*.sdk`), never a literal version.

use crate::core::file_error::FileOperationError;
use crate::pattern::PatternMatcher;
use crate::utils::fs::{atomic_write, read_text_file};
use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One SDK include path under any developer directory: Xcode's
/// `/Applications/Xcode.app/.../SDKs/MacOSX12.3.sdk/usr/include` or the
/// command-line tools' `/Library/Developer/CommandLineTools/SDKs/...`.
const SDK_INCLUDE_PATH: &str = r#"/[^;"'\s]*?/SDKs/MacOSX\d+(?:\.\d+)*\.sdk/usr/include"#;

/// Strips SDK include paths from CMake list strings.
#[derive(Debug, Clone)]
pub struct SdkStripper {
    regex: Regex,
}

impl SdkStripper {
    /// Compiles the SDK path pattern.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in pattern does not compile.
    pub fn new() -> Result<Self> {
        // Leading separator first so `a;SDK;b` keeps exactly one `;`
        let pattern = format!(";{SDK_INCLUDE_PATH}|{SDK_INCLUDE_PATH};?");
        let regex = Regex::new(&pattern).context("Failed to compile SDK path pattern")?;
        Ok(Self {
            regex,
        })
    }

    /// Returns true if `text` contains at least one SDK include path.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Counts SDK include paths in `text`.
    pub fn count(&self, text: &str) -> usize {
        self.regex.find_iter(text).count()
    }

    /// Removes every SDK include path from `text`.
    ///
    /// Returns the new text and the number of paths removed.
    pub fn strip(&self, text: &str) -> (String, usize) {
        let count = self.count(text);
        if count == 0 {
            return (text.to_string(), 0);
        }
        (self.regex.replace_all(text, "").into_owned(), count)
    }

    /// Strips one file in place. The file is only rewritten when it changed.
    ///
    /// # Errors
    ///
    /// Read and write failures are fatal.
    pub fn strip_file(&self, path: &Path) -> Result<usize, FileOperationError> {
        let content = read_text_file(path, "stripping SDK include paths")?;
        let (stripped, count) = self.strip(&content);
        if count > 0 {
            atomic_write(path, stripped.as_bytes())?;
            debug!("Removed {} SDK include path(s) from {}", count, path.display());
        }
        Ok(count)
    }

    /// Strips every file under `root` matching `matcher`.
    ///
    /// Returns the files that changed with their removal counts.
    ///
    /// # Errors
    ///
    /// Traversal, read and write failures are fatal.
    pub fn strip_tree(&self, root: &Path, matcher: &PatternMatcher) -> Result<Vec<(PathBuf, usize)>> {
        let mut changed = Vec::new();
        for file in matcher.find_matches(root)? {
            let count = self.strip_file(&file)?;
            if count > 0 {
                changed.push((file, count));
            }
        }
        info!("Stripped SDK include paths from {} file(s)", changed.len());
        Ok(changed)
    }
}
