//! vtkpkg - packaging helper for the VTK Conan recipe
//!
//! VTK's install step writes CMake package metadata (`VTKTargets.cmake`,
//! `Modules/vtk*.cmake`) that references every dependency through the
//! absolute directory it was installed to on the build machine. vtkpkg turns
//! that metadata into a relocatable package: every dependency root becomes a
//! `${CONAN_<NAME>_ROOT}` placeholder, and include paths into a macOS SDK are
//! removed.
//!
//! # Core Modules
//!
//! - [`relocate`] - root substitution, strict and non-strict modes, fixups,
//!   and SDK stripping ([`relocate::sdk`])
//! - [`pattern`] - glob-based discovery of generated files
//! - [`config`] - dependency roots (`conanbuildinfo.json`, `vtkpkg.toml`)
//!   and the per-platform build profile
//! - [`cli`] - the `vtkpkg` command-line interface
//!
//! ## Supporting Modules
//!
//! - [`core`] - error types and user-facing error rendering
//! - [`utils`] - text file I/O, atomic rewrites, and path normalization
//! - [`constants`] - shared names and token fragments
//!
//! # Example
//!
//! ```rust,no_run
//! use vtkpkg::config::{BuildProfile, Platform, ProfileOptions};
//! use vtkpkg::relocate::{DependencySet, RelocationMode, Relocator};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let deps = DependencySet::from_pairs([
//!     ("zlib", "/home/build/.conan/data/zlib/1.2.11/sight/stable/package/abcd1234"),
//!     ("glew", "/home/build/.conan/data/glew/2.0.0/sight/stable/package/ef567890"),
//! ])?;
//!
//! let profile = BuildProfile::resolve(Platform::Windows, &ProfileOptions::default())?;
//! let relocator = Relocator::new(&deps, RelocationMode::Strict);
//! relocator.apply_fixups(Path::new("package"), &profile.fixups)?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod pattern;
pub mod relocate;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
