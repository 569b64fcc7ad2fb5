//! Configuration inputs of a relocation run.
//!
//! - [`buildinfo`] - dependency roots from Conan's `conanbuildinfo.json`
//! - [`global`] - the `vtkpkg.toml` settings file
//! - [`profile`] - the per-platform build profile of the VTK recipe
//!
//! The dependency set handed to the relocator is assembled by
//! [`collect_dependencies`]: the config table first, then the buildinfo file,
//! then explicit command-line entries, each overriding the previous one.

pub mod buildinfo;
pub mod global;
pub mod profile;

pub use global::RelocateConfig;
pub use profile::{
    BuildProfile, InstallAction, Platform, ProfileOptions, Requirement, SysRequiresMode,
};

use crate::relocate::DependencySet;
use anyhow::Result;
use std::path::Path;

/// Merges every dependency source; later sources win.
///
/// # Errors
///
/// Invalid roots in the config table, buildinfo read or parse failures, and
/// placeholder token collisions between sources.
pub async fn collect_dependencies(
    config: &RelocateConfig,
    buildinfo: Option<&Path>,
    overrides: DependencySet,
) -> Result<DependencySet> {
    let mut deps = config.dependency_set()?;

    if let Some(path) = buildinfo.or(config.buildinfo.as_deref()) {
        deps.extend(buildinfo::load(path).await?)?;
    }

    deps.extend(overrides)?;
    Ok(deps)
}
