//! File system helpers for in-place rewriting of generated files
//!
//! Relocation reads a generated file completely, rewrites its text, and writes
//! it back. Both steps report failures as [`FileOperationError`] so the caller
//! knows exactly which file is now suspect.
//!
//! # Examples
//!
//! ```rust,no_run
//! use vtkpkg::utils::fs::{atomic_write, read_text_file};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let path = Path::new("package/lib/cmake/vtk-8.0/VTKTargets.cmake");
//! let content = read_text_file(path, "relocating dependency roots")?;
//! atomic_write(path, content.replace("/opt/zlib", "${CONAN_ZLIB_ROOT}").as_bytes())?;
//! # Ok(())
//! # }
//! ```

use crate::core::file_error::{FileOperation, FileOperationError, FileResultExt};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Reads a UTF-8 text file, naming `purpose` in any error.
///
/// # Errors
///
/// Returns [`FileOperationError`] if the file cannot be read or is not UTF-8.
pub fn read_text_file(path: &Path, purpose: &str) -> Result<String, FileOperationError> {
    fs::read_to_string(path).with_file_context(FileOperation::Read, path, purpose)
}

/// Atomically replaces the contents of `path`.
///
/// The content is written to a temporary file in the same directory, synced,
/// given the permissions of the file it replaces, and renamed over the
/// target. Readers never observe a half-written file. A crash between files
/// can still leave a tree partially rewritten; there is no cross-file rollback.
///
/// # Errors
///
/// Returns [`FileOperationError`] if any step fails. The original file is
/// untouched unless the final rename succeeded.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<(), FileOperationError> {
    let purpose = "writing relocated content";
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let permissions = match fs::metadata(path) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(FileOperationError::new(FileOperation::Metadata, path, purpose, e)),
    };

    let mut temp = tempfile::Builder::new()
        .prefix(".vtkpkg-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .with_file_context(FileOperation::Write, parent, purpose)?;

    temp.write_all(content).with_file_context(FileOperation::Write, temp.path(), purpose)?;
    temp.as_file().sync_all().with_file_context(FileOperation::Write, temp.path(), purpose)?;

    if let Some(permissions) = permissions {
        fs::set_permissions(temp.path(), permissions).with_file_context(
            FileOperation::Write,
            temp.path(),
            purpose,
        )?;
    }

    temp.persist(path)
        .map_err(|e| FileOperationError::new(FileOperation::Write, path, purpose, e.error))?;

    Ok(())
}
