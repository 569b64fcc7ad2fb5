//! The package step: a platform profile's fixups.
//!
//! Each fixup file is relocated against its own dependency list in strict
//! mode; dependencies missing from the build configuration are skipped. On
//! macOS the fixup files, and then every other file in the CMake package
//! directory, are also stripped of SDK include paths.

use crate::cli::{DependencyArgs, display_path, ensure_directory};
use crate::config::{BuildProfile, Platform, ProfileOptions, RelocateConfig};
use crate::constants::DEFAULT_TARGET_PATTERN;
use crate::core::VtkpkgError;
use crate::pattern::PatternMatcher;
use crate::relocate::{Outcome, RelocationMode, Relocator, SdkStripper};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

/// Run the package-step fixups of a platform.
#[derive(Args, Debug)]
pub struct PackageCommand {
    /// Package folder containing the installed VTK tree
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Target platform (default: from config, else the host)
    #[arg(long, value_enum)]
    pub platform: Option<Platform>,

    #[command(flatten)]
    pub deps: DependencyArgs,
}

impl PackageCommand {
    /// Runs the fixups.
    ///
    /// # Errors
    ///
    /// Missing fixup files, I/O failures and strict-mode misses.
    pub async fn execute(self, settings: &RelocateConfig) -> Result<()> {
        ensure_directory(&self.dir)?;

        let platform = self.platform.or(settings.platform).unwrap_or_else(Platform::current);
        let profile = BuildProfile::resolve(platform, &ProfileOptions::default())?;

        if profile.fixups.is_empty() && !profile.strip_sdk {
            info!("No package fixups on {}", platform);
            println!("Nothing to relocate on {platform}");
            return Ok(());
        }

        let deps = self.deps.resolve(settings).await?;
        if deps.is_empty() && !profile.fixups.is_empty() {
            return Err(VtkpkgError::ConfigError {
                message: "no dependency roots configured; pass --buildinfo or --dep".to_string(),
            }
            .into());
        }

        let stripper = if profile.strip_sdk {
            Some(SdkStripper::new()?)
        } else {
            None
        };

        let mut relocator = Relocator::new(&deps, RelocationMode::Strict);
        if let Some(stripper) = &stripper {
            relocator = relocator.with_sdk_stripping(stripper.clone());
        }

        let report = relocator.apply_fixups(&self.dir, &profile.fixups)?;
        for file in &report.files {
            let skipped: Vec<&str> = file
                .outcomes
                .iter()
                .filter(|(_, outcome)| *outcome == Outcome::NotApplicable)
                .map(|(name, _)| name.as_str())
                .collect();

            let mut line = format!(
                "{} {} ({} root reference(s))",
                "✓".green(),
                display_path(&file.path, &self.dir),
                file.replacements()
            );
            if !skipped.is_empty() {
                line.push_str(&format!(" [not in this build: {}]", skipped.join(", ")));
            }
            println!("{line}");
        }

        let mut sdk_removed = report.total_sdk_paths_removed();
        if let Some(stripper) = &stripper {
            let cmake_dir = self.dir.join(&profile.cmake_package_dir);
            if cmake_dir.is_dir() {
                let matcher = PatternMatcher::new(DEFAULT_TARGET_PATTERN)?;
                sdk_removed +=
                    stripper.strip_tree(&cmake_dir, &matcher)?.iter().map(|(_, n)| n).sum::<usize>();
            }
        }

        println!(
            "Packaged for {}: {} root reference(s) relocated, {} SDK path(s) removed",
            platform,
            report.total_replacements(),
            sdk_removed
        );
        Ok(())
    }
}
