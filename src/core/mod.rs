//! Core types and error handling for vtkpkg
//!
//! - [`error`] - the typed [`VtkpkgError`] enum and CLI-facing [`ErrorContext`]
//! - [`file_error`] - I/O errors carrying the failed operation and path

pub mod error;
pub mod file_error;

pub use error::{ErrorContext, VtkpkgError, user_friendly_error};
pub use file_error::{FileOperation, FileOperationError, FileResultExt};
