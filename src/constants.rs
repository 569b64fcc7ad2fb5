//! Constants shared across the vtkpkg codebase.
//!
//! File names, environment variable names, and token fragments that more
//! than one module needs live here so they are defined exactly once.

/// Default glob for generated build-description files.
///
/// CMake package metadata (`VTKTargets.cmake`, `Modules/vtk*.cmake`) is the
/// only generated output known to embed dependency install roots.
pub const DEFAULT_TARGET_PATTERN: &str = "**/*.cmake";

/// Opening fragment of every placeholder token.
pub const TOKEN_PREFIX: &str = "${CONAN_";

/// Closing fragment of every placeholder token.
pub const TOKEN_SUFFIX: &str = "_ROOT}";

/// Project-local configuration file name.
pub const CONFIG_FILE_NAME: &str = "vtkpkg.toml";

/// Environment variable that overrides the configuration file location.
pub const CONFIG_PATH_ENV: &str = "VTKPKG_CONFIG_PATH";

/// File name Conan's `json` generator writes dependency information to.
pub const BUILDINFO_FILE_NAME: &str = "conanbuildinfo.json";
