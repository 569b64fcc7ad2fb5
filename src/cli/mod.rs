//! Command-line interface for vtkpkg.
//!
//! # Available Commands
//!
//! - `relocate` - replace dependency install roots in a generated tree
//! - `package` - run the platform's package-step fixups
//! - `strip-sdk` - remove leaked macOS SDK include paths
//! - `check` - verify that no roots or SDK paths remain
//! - `profile` - print the resolved build profile of a platform
//!
//! # Typical Workflow
//!
//! ```bash
//! # After `cmake --install`, relocate the package folder
//! vtkpkg package ./package --buildinfo build/conanbuildinfo.json
//!
//! # Fail the build if anything was missed
//! vtkpkg check ./package --buildinfo build/conanbuildinfo.json
//! ```
//!
//! # Configuration
//!
//! Settings come from `vtkpkg.toml` (see [`crate::config::global`]); flags
//! override the file. Dependency roots are merged from the config table, the
//! buildinfo file and `--dep NAME=ROOT` flags, in that order.

pub mod check;
pub mod package;
pub mod profile;
pub mod relocate;
pub mod strip_sdk;


use crate::config::{RelocateConfig, collect_dependencies};
use crate::core::VtkpkgError;
use crate::relocate::{DependencyDescriptor, DependencySet};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Runtime settings derived from the global flags.
///
/// Built once by [`Cli::build_config`] and passed explicitly; nothing is
/// written to the process environment.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Tracing filter directive; `None` disables logging.
    ///
    /// `RUST_LOG` takes precedence when set.
    pub log_level: Option<String>,

    /// Explicit configuration file path.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Creates a configuration with logging disabled and the default
    /// configuration file location.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the log level.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    /// Sets the configuration file path.
    #[must_use]
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// The filter the subscriber is initialized with.
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(self.log_level.as_deref().unwrap_or("off"))
        })
    }

    /// Installs the global tracing subscriber. Later calls are no-ops.
    pub fn init_logging(&self) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.env_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// vtkpkg: relocation of VTK's generated CMake package metadata.
#[derive(Parser, Debug)]
#[command(
    name = "vtkpkg",
    about = "Relocate VTK package metadata for Conan",
    version,
    long_about = "Rewrites absolute dependency install roots in VTK's generated CMake files \
                  into ${CONAN_<NAME>_ROOT} placeholders and strips leaked macOS SDK paths."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging. Mutually exclusive with `--quiet`.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress logging. Command output and errors are still printed.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file (default: ./vtkpkg.toml).
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replace dependency install roots with placeholder tokens
    Relocate(relocate::RelocateCommand),

    /// Run the package-step fixups of a platform profile
    Package(package::PackageCommand),

    /// Remove macOS SDK include paths
    #[command(name = "strip-sdk")]
    StripSdk(strip_sdk::StripSdkCommand),

    /// Verify that no dependency roots or SDK paths remain
    Check(check::CheckCommand),

    /// Show the resolved build profile
    Profile(profile::ProfileCommand),
}

impl Cli {
    /// Executes the parsed command with a configuration built from the flags.
    ///
    /// # Errors
    ///
    /// Whatever the command returns.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translates the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("info".to_string())
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    /// Executes the command with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Configuration loading failures and whatever the command returns.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        let settings = RelocateConfig::load(config.config_path.clone()).await?;
        debug!("Settings: {:?}", settings);

        match self.command {
            Commands::Relocate(cmd) => cmd.execute(&settings).await,
            Commands::Package(cmd) => cmd.execute(&settings).await,
            Commands::StripSdk(cmd) => cmd.execute(&settings),
            Commands::Check(cmd) => cmd.execute(&settings).await,
            Commands::Profile(cmd) => cmd.execute(&settings).await,
        }
    }
}

/// Output format of reporting commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON on stdout
    Json,
}

/// Dependency root flags shared by the relocation commands.
#[derive(Args, Debug, Clone, Default)]
pub struct DependencyArgs {
    /// Conan `json` generator output with dependency roots
    #[arg(long, value_name = "FILE")]
    pub buildinfo: Option<PathBuf>,

    /// Dependency root, repeatable; overrides every other source
    #[arg(long = "dep", value_name = "NAME=ROOT", value_parser = parse_dep_spec)]
    pub deps: Vec<DependencyDescriptor>,
}

impl DependencyArgs {
    /// Merges the config table, the buildinfo file and the `--dep` flags.
    ///
    /// # Errors
    ///
    /// Invalid roots and buildinfo read or parse failures.
    pub async fn resolve(&self, settings: &RelocateConfig) -> Result<DependencySet> {
        let mut overrides = DependencySet::new();
        for descriptor in &self.deps {
            overrides.insert(descriptor.clone())?;
        }
        let deps = collect_dependencies(settings, self.buildinfo.as_deref(), overrides).await?;
        debug!("{} dependency root(s) configured", deps.len());
        Ok(deps)
    }
}

/// Parses a `NAME=ROOT` argument.
///
/// # Errors
///
/// [`VtkpkgError::InvalidDependencySpec`] without `=` or with an empty side,
/// [`VtkpkgError::InvalidRoot`] for an unusable root.
pub fn parse_dep_spec(spec: &str) -> Result<DependencyDescriptor, VtkpkgError> {
    let invalid = || VtkpkgError::InvalidDependencySpec {
        spec: spec.to_string(),
    };

    let (name, root) = spec.split_once('=').ok_or_else(invalid)?;
    let name = name.trim();
    if name.is_empty() || root.trim().is_empty() {
        return Err(invalid());
    }
    DependencyDescriptor::new(name, shellexpand::tilde(root.trim()))
}

/// Fails unless `dir` is an existing directory.
pub(crate) fn ensure_directory(dir: &Path) -> Result<(), VtkpkgError> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(VtkpkgError::FileSystemError {
            operation: "opening package directory".to_string(),
            path: dir.display().to_string(),
        })
    }
}

/// `path` relative to `base` for display, or `path` itself.
pub(crate) fn display_path(path: &Path, base: &Path) -> String {
    path.strip_prefix(base).unwrap_or(path).display().to_string()
}
