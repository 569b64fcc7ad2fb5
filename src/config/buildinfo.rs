//! Dependency roots from Conan's `json` generator.
//!
//! `conan install -g json` writes `conanbuildinfo.json`, whose
//! `dependencies` array records every resolved package with its `rootpath`.
//! Only `name` and `rootpath` matter here; every other field is ignored.
//!
//! ```json
//! {
//!   "dependencies": [
//!     { "name": "zlib", "version": "1.2.11",
//!       "rootpath": "/home/build/.conan/data/zlib/1.2.11/sight/stable/package/abcd1234" }
//!   ]
//! }
//! ```

use crate::core::VtkpkgError;
use crate::core::file_error::{FileOperation, FileResultExt};
use crate::relocate::{DependencyDescriptor, DependencySet};
use anyhow::Result;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct BuildInfo {
    #[serde(default)]
    dependencies: Vec<BuildInfoDependency>,
}

#[derive(Debug, Deserialize)]
struct BuildInfoDependency {
    name: String,
    rootpath: String,
}

/// Parses build info JSON. `label` names the source in errors.
///
/// # Errors
///
/// [`VtkpkgError::BuildinfoParseError`] for malformed JSON,
/// [`VtkpkgError::InvalidRoot`] for unusable roots,
/// [`VtkpkgError::TokenCollision`] for names sharing a placeholder.
pub fn parse(content: &str, label: &str) -> Result<DependencySet, VtkpkgError> {
    let info: BuildInfo =
        serde_json::from_str(content).map_err(|e| VtkpkgError::BuildinfoParseError {
            file: label.to_string(),
            reason: e.to_string(),
        })?;

    let mut set = DependencySet::new();
    for dep in info.dependencies {
        debug!("Build info: {} -> {}", dep.name, dep.rootpath);
        set.insert(DependencyDescriptor::new(dep.name, &dep.rootpath)?)?;
    }
    Ok(set)
}

/// Loads build info from disk.
///
/// # Errors
///
/// Read failures and parse errors.
pub async fn load(path: &Path) -> Result<DependencySet> {
    let content = tokio::fs::read_to_string(path).await.with_file_context(
        FileOperation::Read,
        path,
        "loading dependency build info",
    )?;
    Ok(parse(&content, &path.display().to_string())?)
}
