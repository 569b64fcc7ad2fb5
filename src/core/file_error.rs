//! Structured file system error handling for vtkpkg
//!
//! Relocation treats every read or write failure as fatal, so the error must
//! say exactly which file and which step failed. The context is captured at the
//! operation site instead of being reconstructed from an `io::Error` message.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Types of file operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    /// Reading a file completely
    Read,
    /// Writing a file
    Write,
    /// Getting file metadata
    Metadata,
    /// Walking a directory tree
    Walk,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::Write => write!(f, "writing"),
            FileOperation::Metadata => write!(f, "getting file metadata"),
            FileOperation::Walk => write!(f, "walking directory"),
        }
    }
}

/// File operation error with the path and purpose of the failed access
#[derive(Error, Debug)]
#[error("File operation failed: {operation} {}", file_path.display())]
pub struct FileOperationError {
    /// The type of operation that failed
    pub operation: FileOperation,
    /// The file path that was being accessed
    pub file_path: PathBuf,
    /// Why the file was being accessed
    pub purpose: String,
    /// The underlying IO error
    #[source]
    pub source: std::io::Error,
}

impl FileOperationError {
    /// Create a new file operation error
    pub fn new(
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Self {
            operation,
            file_path: file_path.into(),
            purpose: purpose.into(),
            source,
        }
    }

    /// Get a user-friendly error message with context
    pub fn user_message(&self) -> String {
        let reason = match self.source.kind() {
            std::io::ErrorKind::NotFound => "file not found".to_string(),
            std::io::ErrorKind::PermissionDenied => "permission denied".to_string(),
            std::io::ErrorKind::InvalidData => "file is not valid UTF-8 text".to_string(),
            _ => self.source.to_string(),
        };

        format!(
            "Failed {} '{}' while {}: {}",
            self.operation,
            self.file_path.display(),
            self.purpose,
            reason
        )
    }
}

/// Extension trait attaching [`FileOperationError`] context to I/O results
pub trait FileResultExt<T> {
    /// Wrap an I/O error with the operation, path and purpose
    fn with_file_context(
        self,
        operation: FileOperation,
        path: &Path,
        purpose: &str,
    ) -> Result<T, FileOperationError>;
}

impl<T> FileResultExt<T> for std::io::Result<T> {
    fn with_file_context(
        self,
        operation: FileOperation,
        path: &Path,
        purpose: &str,
    ) -> Result<T, FileOperationError> {
        self.map_err(|source| FileOperationError::new(operation, path, purpose, source))
    }
}
