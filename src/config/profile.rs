//! Per-platform build profile for the VTK recipe.
//!
//! Everything that differs between Linux, macOS and Windows is decided here,
//! once, by [`BuildProfile::resolve`]: which packages are required, which
//! CMake definitions are passed, which patches are applied, which system
//! packages are needed, and which generated files the package step relocates.
//! The build and relocation steps consume the resolved profile and never
//! branch on the platform themselves.
//!
//! Only the latest recipe revision's option set is reproduced.
//!
//! # Examples
//!
//! ```rust,no_run
//! use vtkpkg::config::{BuildProfile, Platform, ProfileOptions};
//!
//! # fn example() -> anyhow::Result<()> {
//! let profile = BuildProfile::resolve(Platform::Macos, &ProfileOptions::default())?;
//! for arg in profile.cmake_args() {
//!     println!("{arg}");
//! }
//! # Ok(())
//! # }
//! ```

use crate::core::VtkpkgError;
use crate::relocate::{Fixup, RelocationMode};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Recipe name.
pub const RECIPE_NAME: &str = "vtk";

/// Recipe version: upstream release plus recipe revision.
pub const RECIPE_VERSION: &str = "8.0.1-r1";

/// Conan user/channel of every requirement.
const REQUIREMENT_CHANNEL: (&str, &str) = ("sight", "stable");

/// Linux distribution whose system packages the recipe installs.
const SYSTEM_PACKAGES_DISTRO: &str = "linuxmint";

/// Target operating system of a build.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Linux: most dependencies come from the system
    Linux,
    /// macOS
    Macos,
    /// Windows
    Windows,
}

impl Platform {
    /// The platform this binary was compiled for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::Macos
        } else {
            Self::Linux
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::Macos => write!(f, "macos"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

impl FromStr for Platform {
    type Err = VtkpkgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "macos" | "darwin" | "osx" => Ok(Self::Macos),
            "windows" | "win" => Ok(Self::Windows),
            _ => Err(VtkpkgError::UnknownPlatform {
                name: s.to_string(),
            }),
        }
    }
}

/// How system packages are handled.
///
/// Passed explicitly to [`BuildProfile::install_action`]; never read from
/// the process environment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SysRequiresMode {
    /// Install missing packages
    #[default]
    Enabled,
    /// Only check that packages are installed
    Verify,
    /// Do nothing
    Disabled,
}

/// What the system package installer collaborator is asked to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "packages", rename_all = "lowercase")]
pub enum InstallAction {
    /// Update the package index and install these packages
    Install(Vec<String>),
    /// Fail if any of these packages is missing
    Verify(Vec<String>),
    /// Nothing to do
    Skip,
}

/// A Conan package reference, `name/version@user/channel`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    /// Package name; also the dependency name used for relocation
    pub name: String,
    /// Package version
    pub version: String,
    /// Conan user
    pub user: String,
    /// Conan channel
    pub channel: String,
}

impl Requirement {
    fn sight(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            user: REQUIREMENT_CHANNEL.0.to_string(),
            channel: REQUIREMENT_CHANNEL.1.to_string(),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}/{}", self.name, self.version, self.user, self.channel)
    }
}

/// Recipe options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileOptions {
    /// Build shared libraries
    pub shared: bool,
    /// Linux distribution id (`ID` from os-release), if known
    pub distro: Option<String>,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            shared: true,
            distro: None,
        }
    }
}

/// Everything platform-dependent about building and packaging VTK.
#[derive(Debug, Clone, Serialize)]
pub struct BuildProfile {
    /// Target platform
    pub platform: Platform,
    /// Recipe version (`8.0.1-r1`)
    pub version: String,
    /// Upstream VTK release (`8.0.1`)
    pub upstream_version: String,
    /// Source tarball
    pub source_url: String,
    /// Directory the tarball extracts to
    pub source_dir: String,
    /// Installed CMake package directory, relative to the package folder
    pub cmake_package_dir: PathBuf,
    /// Conan requirements
    pub requirements: Vec<Requirement>,
    /// Patch files applied to the source tree, in order
    pub patches: Vec<String>,
    /// CMake project wrapper copied over the top-level `CMakeLists.txt`
    pub project_wrapper: String,
    /// CMake cache definitions
    pub cmake_definitions: BTreeMap<String, String>,
    /// System packages (Linux Mint only)
    pub system_packages: Vec<String>,
    /// Relocation plan of the package step
    pub fixups: Vec<Fixup>,
    /// Whether the package step strips SDK include paths
    pub strip_sdk: bool,
}

impl BuildProfile {
    /// Resolves the profile for `platform`.
    ///
    /// # Errors
    ///
    /// Only fails if [`RECIPE_VERSION`] is not valid semver.
    pub fn resolve(platform: Platform, options: &ProfileOptions) -> Result<Self> {
        let version = semver::Version::parse(RECIPE_VERSION)
            .with_context(|| format!("Invalid recipe version: {RECIPE_VERSION}"))?;
        let upstream_version = format!("{}.{}.{}", version.major, version.minor, version.patch);
        let cmake_package_dir =
            PathBuf::from(format!("lib/cmake/{RECIPE_NAME}-{}.{}", version.major, version.minor));

        let fixups = if platform == Platform::Linux {
            Vec::new()
        } else {
            package_fixups(&cmake_package_dir)
        };

        Ok(Self {
            platform,
            version: RECIPE_VERSION.to_string(),
            source_url: format!("https://github.com/Kitware/VTK/archive/v{upstream_version}.tar.gz"),
            source_dir: format!("VTK-{upstream_version}"),
            upstream_version,
            cmake_package_dir,
            requirements: requirements(platform),
            patches: patches(),
            project_wrapper: "patches/CMakeProjectWrapper.txt".to_string(),
            cmake_definitions: cmake_definitions(platform, options.shared),
            system_packages: system_packages(platform, options.distro.as_deref()),
            fixups,
            strip_sdk: platform == Platform::Macos,
        })
    }

    /// CMake definitions as sorted `-DKEY=VALUE` arguments.
    pub fn cmake_args(&self) -> Vec<String> {
        self.cmake_definitions.iter().map(|(key, value)| format!("-D{key}={value}")).collect()
    }

    /// Names of the required packages, i.e. the dependencies relocation may see.
    pub fn requirement_names(&self) -> Vec<&str> {
        self.requirements.iter().map(|r| r.name.as_str()).collect()
    }

    /// What the system package installer should do under `mode`.
    pub fn install_action(&self, mode: SysRequiresMode) -> InstallAction {
        if self.system_packages.is_empty() {
            return InstallAction::Skip;
        }
        match mode {
            SysRequiresMode::Enabled => InstallAction::Install(self.system_packages.clone()),
            SysRequiresMode::Verify => InstallAction::Verify(self.system_packages.clone()),
            SysRequiresMode::Disabled => InstallAction::Skip,
        }
    }
}

fn requirements(platform: Platform) -> Vec<Requirement> {
    let mut reqs = vec![Requirement::sight("qt", "5.11.2"), Requirement::sight("glew", "2.0.0")];

    // Linux builds link the distribution's copies of these
    if platform != Platform::Linux {
        reqs.extend([
            Requirement::sight("libjpeg", "9c"),
            Requirement::sight("expat", "2.2.5"),
            Requirement::sight("libxml2", "2.9.8"),
            Requirement::sight("freetype", "2.9.1"),
            Requirement::sight("libpng", "1.6.34"),
            Requirement::sight("libtiff", "4.0.9"),
            Requirement::sight("zlib", "1.2.11"),
        ]);
    }
    reqs
}

fn patches() -> Vec<String> {
    [
        "patches/IO_Import_CMakeLists.diff",
        "patches/optimization.diff",
        "patches/CMakeLists_glew.diff",
        "patches/QVTKOpenGLWidget.diff",
        "patches/offscreen_size_windows.diff",
    ]
    .iter()
    .map(|p| (*p).to_string())
    .collect()
}

fn cmake_definitions(platform: Platform, shared: bool) -> BTreeMap<String, String> {
    let on_off = |b: bool| if b { "ON" } else { "OFF" };

    let mut defs: BTreeMap<String, String> = [
        ("BUILD_EXAMPLES", "OFF"),
        ("BUILD_TESTING", "OFF"),
        ("BUILD_DOCUMENTATION", "OFF"),
        ("VTK_USE_SYSTEM_EXPAT", "ON"),
        ("VTK_USE_SYSTEM_JPEG", "ON"),
        ("VTK_USE_SYSTEM_LIBXML2", "ON"),
        ("VTK_USE_SYSTEM_PNG", "ON"),
        ("VTK_USE_SYSTEM_ZLIB", "ON"),
        ("VTK_USE_SYSTEM_FREETYPE", "ON"),
        ("VTK_USE_SYSTEM_TIFF", "ON"),
        ("VTK_USE_SYSTEM_GLEW", "ON"),
        ("VTK_Group_StandAlone", "OFF"),
        ("VTK_USE_GL2PS", "ON"),
        ("VTK_USE_GLSL_SHADERS", "ON"),
        ("VTK_USE_TK", "OFF"),
        ("VTK_LEGACY_REMOVE", "OFF"),
        ("VTK_USE_PARALLEL", "ON"),
        ("VTK_USE_HYBRID", "ON"),
        ("TK_Group_Qt", "OFF"),
        ("VTK_WRAP_PYTHON", "OFF"),
        ("VTK_MAKE_INSTANTIATORS", "ON"),
        ("VTK_QT_VERSION", "5"),
        ("VTK_BUILD_QT_DESIGNER_PLUGIN", "OFF"),
        ("Module_vtkFiltersFlowPaths", "ON"),
        ("Module_vtkGUISupportQt", "ON"),
        ("Module_vtkGUISupportQtOpenGL", "ON"),
        ("Module_vtkGUISupportQtWebkit", "OFF"),
        ("Module_vtkGUISupportQtSQL", "ON"),
        ("Module_vtkRenderingQt", "ON"),
        ("Module_vtkViewsQt", "ON"),
        ("Module_vtkIOExport", "ON"),
        ("Module_vtkImagingStencil", "ON"),
        ("Module_vtkImagingStatistics", "ON"),
        ("Module_vtkIOImport", "ON"),
        ("Module_vtkIOLegacy", "ON"),
        ("Module_vtkIOGeometry", "ON"),
        ("Module_vtkIOPLY", "ON"),
    ]
    .iter()
    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
    .collect();

    defs.insert("BUILD_SHARED_LIBS".to_string(), on_off(shared).to_string());

    if platform == Platform::Macos {
        defs.insert("VTK_USE_CARBON".to_string(), "OFF".to_string());
        defs.insert("VTK_USE_COCOA".to_string(), "ON".to_string());
    }

    if platform != Platform::Windows {
        defs.insert("CMAKE_POSITION_INDEPENDENT_CODE".to_string(), "ON".to_string());
    }

    defs
}

fn system_packages(platform: Platform, distro: Option<&str>) -> Vec<String> {
    if platform != Platform::Linux || distro != Some(SYSTEM_PACKAGES_DISTRO) {
        return Vec::new();
    }

    [
        "freeglut3-dev",
        "mesa-common-dev",
        "mesa-utils-extra",
        "libgl1-mesa-dev",
        "libglapi-mesa",
        "libsm-dev",
        "libx11-dev",
        "libxext-dev",
        "libxt-dev",
        "libglu1-mesa-dev",
        "libfreetype6-dev",
        "libxml2-dev",
        "libexpat1-dev",
        "libicu-dev",
        "libpng-dev",
        "libjpeg-turbo8-dev",
        "libtiff5-dev",
    ]
    .iter()
    .map(|p| (*p).to_string())
    .collect()
}

fn package_fixups(cmake_dir: &Path) -> Vec<Fixup> {
    fn fixup(file: PathBuf, deps: &[&str]) -> Fixup {
        Fixup {
            file,
            dependencies: deps.iter().map(|d| (*d).to_string()).collect(),
            mode: RelocationMode::Strict,
        }
    }

    let modules = cmake_dir.join("Modules");

    vec![
        fixup(cmake_dir.join("VTKTargets.cmake"), &["zlib", "freetype", "glew"]),
        fixup(modules.join("vtkexpat.cmake"), &["expat"]),
        fixup(modules.join("vtkfreetype.cmake"), &["freetype"]),
        fixup(modules.join("vtkglew.cmake"), &["glew"]),
        fixup(modules.join("vtkjpeg.cmake"), &["libjpeg"]),
        fixup(modules.join("vtkpng.cmake"), &["libpng", "zlib"]),
        fixup(modules.join("vtktiff.cmake"), &["libtiff"]),
        fixup(modules.join("vtkzlib.cmake"), &["zlib"]),
    ]
}

/// Reads the distribution id from `/etc/os-release`, if present.
pub async fn detect_linux_distro() -> Option<String> {
    let content = tokio::fs::read_to_string("/etc/os-release").await.ok()?;
    parse_os_release_id(&content)
}

fn parse_os_release_id(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        line.strip_prefix("ID=").map(|id| id.trim().trim_matches('"').to_string())
    })
}
