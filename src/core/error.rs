//! Error handling for vtkpkg
//!
//! The error system follows two rules:
//! 1. **Strongly-typed errors** ([`VtkpkgError`]) so callers and tests can match
//!    on the exact failure (a strict-mode miss is not an I/O failure).
//! 2. **User-friendly messages** ([`ErrorContext`]) with details and a suggestion
//!    for the CLI.
//!
//! # Error Taxonomy
//!
//! Relocation distinguishes three classes of outcome:
//! - **Configuration absence**: a dependency the plan mentions is not part of
//!   the current build. This is not an error at all; the relocator records
//!   it as not applicable.
//! - **Path absence**: a dependency root does not occur in a file. Tolerated in
//!   non-strict mode, [`VtkpkgError::PathNotFound`] in strict mode.
//! - **I/O failure**: reading or writing a target file failed. Always fatal,
//!   reported through [`crate::core::file_error::FileOperationError`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use vtkpkg::core::{VtkpkgError, ErrorContext, user_friendly_error};
//!
//! let err = anyhow::Error::from(VtkpkgError::PathNotFound {
//!     dependency: "zlib".to_string(),
//!     root: "/home/build/.conan/data/zlib".to_string(),
//!     file: "lib/cmake/vtk-8.0/VTKTargets.cmake".to_string(),
//! });
//!
//! let ctx = user_friendly_error(err);
//! ctx.display(); // colored error, details and suggestion on stderr
//! ```

use crate::core::file_error::{FileOperation, FileOperationError};
use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for vtkpkg operations.
#[derive(Error, Debug, Clone)]
pub enum VtkpkgError {
    /// A strict-mode relocation did not find the dependency root in a file
    /// that is guaranteed to reference it.
    #[error("Install root of '{dependency}' not found in {file}")]
    PathNotFound {
        /// Logical dependency name
        dependency: String,
        /// The normalized root that was searched for
        root: String,
        /// The file that was expected to contain it
        file: String,
    },

    /// A dependency descriptor carries a root that is not a usable absolute path.
    #[error("Invalid install root for dependency '{name}': {root} ({reason})")]
    InvalidRoot {
        /// Logical dependency name
        name: String,
        /// The rejected root
        root: String,
        /// Why it was rejected
        reason: String,
    },

    /// Two dependency names sanitize to the same placeholder token.
    #[error("Dependencies '{existing}' and '{name}' would both relocate to {token}")]
    TokenCollision {
        /// The dependency being added
        name: String,
        /// The dependency already holding the token
        existing: String,
        /// The shared token
        token: String,
    },

    /// A `NAME=ROOT` dependency argument could not be split.
    #[error("Invalid dependency specification: '{spec}' (expected NAME=ROOT)")]
    InvalidDependencySpec {
        /// The argument as given
        spec: String,
    },

    /// A target file glob failed to compile.
    #[error("Invalid file pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The glob as given
        pattern: String,
        /// Parser message
        reason: String,
    },

    /// Generic file system failure without a more specific variant.
    #[error("File system error during {operation}: {path}")]
    FileSystemError {
        /// What was being done
        operation: String,
        /// Path involved
        path: String,
    },

    /// Insufficient permissions on a target file or directory.
    #[error("Permission denied during {operation}: {path}")]
    PermissionDenied {
        /// What was being done
        operation: String,
        /// Path involved
        path: String,
    },

    /// `vtkpkg.toml` is syntactically or structurally invalid.
    #[error("Failed to parse configuration file {file}: {reason}")]
    ConfigParseError {
        /// Configuration file path
        file: String,
        /// Parser message
        reason: String,
    },

    /// `conanbuildinfo.json` is syntactically or structurally invalid.
    #[error("Failed to parse build info {file}: {reason}")]
    BuildinfoParseError {
        /// Build info file path
        file: String,
        /// Parser message
        reason: String,
    },

    /// Semantic configuration problem.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },

    /// A platform name that is not linux, macos or windows.
    #[error("Unknown platform: {name}")]
    UnknownPlatform {
        /// The name as given
        name: String,
    },

    /// Post-relocation verification found absolute paths that survived.
    #[error("{count} absolute path reference(s) remain after relocation")]
    UnrelocatedPaths {
        /// Number of leftover references
        count: usize,
    },

    /// Anything else, already formatted for display.
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

/// A [`VtkpkgError`] decorated with an explanation and an actionable suggestion.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: VtkpkgError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context with no suggestion or details.
    #[must_use]
    pub const fn new(error: VtkpkgError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion, shown in green.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details, shown in yellow.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error, details and suggestion to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] suitable for CLI display.
///
/// Known error types are looked up anywhere in the `anyhow` chain so that
/// context added with `.with_context(...)` does not hide them.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for cause in error.chain() {
        if let Some(err) = cause.downcast_ref::<VtkpkgError>() {
            return create_error_context(err.clone());
        }

        if let Some(file_err) = cause.downcast_ref::<FileOperationError>() {
            return file_error_context(file_err);
        }

        if let Some(io_error) = cause.downcast_ref::<std::io::Error>() {
            if io_error.kind() == std::io::ErrorKind::PermissionDenied {
                return ErrorContext::new(VtkpkgError::PermissionDenied {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check ownership of the package folder")
                .with_details(format!("{error:#}"));
            }
        }

        if let Some(toml_error) = cause.downcast_ref::<toml::de::Error>() {
            return ErrorContext::new(VtkpkgError::ConfigParseError {
                file: crate::constants::CONFIG_FILE_NAME.to_string(),
                reason: toml_error.message().to_string(),
            })
            .with_suggestion("Check the TOML syntax of your configuration file");
        }

        if let Some(json_error) = cause.downcast_ref::<serde_json::Error>() {
            return ErrorContext::new(VtkpkgError::BuildinfoParseError {
                file: crate::constants::BUILDINFO_FILE_NAME.to_string(),
                reason: json_error.to_string(),
            })
            .with_suggestion("Regenerate the build info with `conan install -g json`");
        }
    }

    ErrorContext::new(VtkpkgError::Other {
        message: format!("{error:#}"),
    })
}

fn file_error_context(err: &FileOperationError) -> ErrorContext {
    let path = err.file_path.display().to_string();
    let operation = err.operation.to_string();
    let error = if err.source.kind() == std::io::ErrorKind::PermissionDenied {
        VtkpkgError::PermissionDenied {
            operation,
            path,
        }
    } else {
        VtkpkgError::FileSystemError {
            operation,
            path,
        }
    };

    let suggestion = match err.operation {
        FileOperation::Write => {
            "The package folder is now partially relocated; rebuild the package from a clean state"
        }
        _ => "Check that the package folder exists and was fully populated by the install step",
    };

    ErrorContext::new(error).with_details(err.user_message()).with_suggestion(suggestion)
}

fn create_error_context(error: VtkpkgError) -> ErrorContext {
    match &error {
        VtkpkgError::PathNotFound {
            root,
            ..
        } => {
            let details = format!(
                "Strict relocation requires '{root}' (or its placeholder token) to appear in the file"
            );
            ErrorContext::new(error)
                .with_details(details)
                .with_suggestion("Verify the build info matches the build that produced this package")
        }
        VtkpkgError::InvalidRoot {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Dependency roots must be absolute paths such as /home/build/.conan/data/..."),
        VtkpkgError::TokenCollision {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Each placeholder must name one dependency; drop or rename one of them"),
        VtkpkgError::InvalidDependencySpec {
            ..
        } => ErrorContext::new(error).with_suggestion("Use --dep zlib=/path/to/zlib/package"),
        VtkpkgError::InvalidPattern {
            ..
        } => ErrorContext::new(error).with_suggestion("Use a glob such as '**/*.cmake'"),
        VtkpkgError::UnknownPlatform {
            ..
        } => ErrorContext::new(error).with_suggestion("Valid platforms are: linux, macos, windows"),
        VtkpkgError::UnrelocatedPaths {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Run `vtkpkg relocate` with the dependencies listed above"),
        VtkpkgError::ConfigParseError {
            ..
        } => ErrorContext::new(error).with_suggestion("Check the TOML syntax of your configuration file"),
        _ => ErrorContext::new(error),
    }
}
