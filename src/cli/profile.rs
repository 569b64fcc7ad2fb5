//! Display of the resolved build profile.

use crate::cli::OutputFormat;
use crate::config::{BuildProfile, Platform, ProfileOptions, RelocateConfig, profile};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;

/// Show the build profile of a platform.
#[derive(Args, Debug)]
pub struct ProfileCommand {
    /// Target platform (default: from config, else the host)
    #[arg(long, value_enum)]
    pub platform: Option<Platform>,

    /// Build static libraries
    #[arg(long = "static")]
    pub static_libs: bool,

    /// Linux distribution id (default: from /etc/os-release)
    #[arg(long, value_name = "ID")]
    pub distro: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct ProfileOutput<'a> {
    #[serde(flatten)]
    profile: &'a BuildProfile,
    cmake_args: Vec<String>,
    install_action: profile::InstallAction,
}

impl ProfileCommand {
    /// Resolves and prints the profile.
    ///
    /// # Errors
    ///
    /// Profile resolution and JSON serialization failures.
    pub async fn execute(self, settings: &RelocateConfig) -> Result<()> {
        let platform = self.platform.or(settings.platform).unwrap_or_else(Platform::current);
        let distro = match self.distro {
            Some(distro) => Some(distro),
            None if platform == Platform::Linux && platform == Platform::current() => {
                profile::detect_linux_distro().await
            }
            None => None,
        };

        let options = ProfileOptions {
            shared: !self.static_libs,
            distro,
        };
        let resolved = BuildProfile::resolve(platform, &options)?;
        let install_action = resolved.install_action(settings.sysrequires_mode);

        if self.format == OutputFormat::Json {
            let output = ProfileOutput {
                profile: &resolved,
                cmake_args: resolved.cmake_args(),
                install_action,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        println!("{} {} for {}", "vtk".bold(), resolved.version, platform);
        println!("  Source: {}", resolved.source_url);

        println!("\n{}", "Requirements:".bold());
        for req in &resolved.requirements {
            println!("  {req}");
        }

        println!("\n{}", "Patches:".bold());
        println!("  {} (project wrapper)", resolved.project_wrapper);
        for patch in &resolved.patches {
            println!("  {patch}");
        }

        println!("\n{}", "CMake arguments:".bold());
        for arg in resolved.cmake_args() {
            println!("  {arg}");
        }

        println!("\n{}", "System packages:".bold());
        match &install_action {
            profile::InstallAction::Install(packages) => {
                println!("  install: {}", packages.join(" "));
            }
            profile::InstallAction::Verify(packages) => {
                println!("  verify: {}", packages.join(" "));
            }
            profile::InstallAction::Skip => println!("  none"),
        }

        println!("\n{}", "Package fixups:".bold());
        if resolved.fixups.is_empty() {
            println!("  none");
        }
        for fixup in &resolved.fixups {
            println!("  {} <- {}", fixup.file.display(), fixup.dependencies.join(", "));
        }
        if resolved.strip_sdk {
            println!("  SDK include paths are stripped");
        }
        Ok(())
    }
}
