//! Relocation settings file (`vtkpkg.toml`).
//!
//! Every field is optional; command-line flags override the file.
//!
//! ```toml
//! pattern = "**/*.cmake"
//! strict = false
//! strip_sdk = true
//! platform = "macos"
//! sysrequires_mode = "verify"
//! buildinfo = "build/conanbuildinfo.json"
//!
//! [dependencies]
//! zlib = "~/.conan/data/zlib/1.2.11/sight/stable/package/abcd1234"
//! ```
//!
//! # Location
//!
//! The first of these that applies is used:
//!
//! 1. the `--config` flag (the file must exist)
//! 2. the `VTKPKG_CONFIG_PATH` environment variable
//! 3. `vtkpkg.toml` in the current directory
//! 4. `vtkpkg/config.toml` in the user configuration directory
//!
//! A missing file in locations 2-4 yields the defaults.

use crate::config::profile::{Platform, SysRequiresMode};
use crate::constants::{CONFIG_FILE_NAME, CONFIG_PATH_ENV, DEFAULT_TARGET_PATTERN};
use crate::core::VtkpkgError;
use crate::core::file_error::{FileOperation, FileResultExt};
use crate::relocate::{DependencySet, RelocationMode};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

fn default_pattern() -> String {
    DEFAULT_TARGET_PATTERN.to_string()
}

/// Settings loaded from `vtkpkg.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelocateConfig {
    /// Glob selecting the generated files to relocate
    pub pattern: String,

    /// Treat a missing root as an error
    pub strict: bool,

    /// Remove macOS SDK include paths while relocating
    pub strip_sdk: bool,

    /// Target platform; the host platform when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,

    /// System package handling
    pub sysrequires_mode: SysRequiresMode,

    /// Conan `json` generator output to read dependency roots from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buildinfo: Option<PathBuf>,

    /// Dependency name to install root
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, String>,
}

impl Default for RelocateConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
            strict: false,
            strip_sdk: false,
            platform: None,
            sysrequires_mode: SysRequiresMode::default(),
            buildinfo: None,
            dependencies: BTreeMap::new(),
        }
    }
}

impl RelocateConfig {
    /// Loads the configuration from the first applicable location.
    ///
    /// # Errors
    ///
    /// Fails if an explicit path does not exist, or if the file cannot be
    /// read or parsed.
    pub async fn load(explicit: Option<PathBuf>) -> Result<Self> {
        let env = std::env::var_os(CONFIG_PATH_ENV);
        match Self::resolve_path(explicit, env, Path::new(".")) {
            ConfigLocation::Explicit(path) => Self::load_from(&path).await,
            ConfigLocation::Optional(path) if path.exists() => Self::load_from(&path).await,
            ConfigLocation::Optional(path) => {
                debug!("No configuration at {}, using defaults", path.display());
                Ok(Self::default())
            }
        }
    }

    /// Loads the configuration from `path`.
    ///
    /// # Errors
    ///
    /// Read failures, and [`VtkpkgError::ConfigParseError`] for invalid TOML.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.with_file_context(
            FileOperation::Read,
            path,
            "loading vtkpkg configuration",
        )?;
        debug!("Loaded configuration from {}", path.display());
        Ok(Self::parse(&content, &path.display().to_string())?)
    }

    /// Parses configuration TOML. `label` names the source in errors.
    ///
    /// # Errors
    ///
    /// [`VtkpkgError::ConfigParseError`] for invalid TOML or unknown values.
    pub fn parse(content: &str, label: &str) -> Result<Self, VtkpkgError> {
        toml::from_str(content).map_err(|e: toml::de::Error| VtkpkgError::ConfigParseError {
            file: label.to_string(),
            reason: e.message().to_string(),
        })
    }

    fn resolve_path(explicit: Option<PathBuf>, env: Option<OsString>, cwd: &Path) -> ConfigLocation {
        if let Some(path) = explicit {
            return ConfigLocation::Explicit(path);
        }
        if let Some(path) = env.filter(|p| !p.is_empty()) {
            return ConfigLocation::Optional(PathBuf::from(path));
        }

        let local = cwd.join(CONFIG_FILE_NAME);
        if local.exists() {
            return ConfigLocation::Optional(local);
        }
        match dirs::config_dir() {
            Some(dir) => ConfigLocation::Optional(dir.join("vtkpkg").join("config.toml")),
            None => ConfigLocation::Optional(local),
        }
    }

    /// The `[dependencies]` table as a dependency set, `~` expanded.
    ///
    /// # Errors
    ///
    /// [`VtkpkgError::InvalidRoot`] for an unusable root.
    pub fn dependency_set(&self) -> Result<DependencySet, VtkpkgError> {
        DependencySet::from_pairs(
            self.dependencies.iter().map(|(name, root)| (name.clone(), shellexpand::tilde(root))),
        )
    }

    /// Default relocation mode.
    pub const fn mode(&self) -> RelocationMode {
        if self.strict {
            RelocationMode::Strict
        } else {
            RelocationMode::NonStrict
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ConfigLocation {
    Explicit(PathBuf),
    Optional(PathBuf),
}
