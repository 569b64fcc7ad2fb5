//! Pattern-driven relocation of a whole tree.

use crate::cli::{DependencyArgs, display_path, ensure_directory};
use crate::config::RelocateConfig;
use crate::pattern::PatternMatcher;
use crate::relocate::{RelocationMode, Relocator, SdkStripper};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

/// Replace dependency install roots in every matching file.
#[derive(Args, Debug)]
pub struct RelocateCommand {
    /// Directory to relocate, usually the package folder
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Glob selecting files, relative to DIR (default: **/*.cmake)
    #[arg(long, value_name = "GLOB")]
    pub pattern: Option<String>,

    /// Fail when a dependency root does not occur in a file
    #[arg(long)]
    pub strict: bool,

    /// Also remove macOS SDK include paths
    #[arg(long)]
    pub strip_sdk: bool,

    #[command(flatten)]
    pub deps: DependencyArgs,
}

impl RelocateCommand {
    /// Runs the relocation.
    ///
    /// # Errors
    ///
    /// Invalid inputs, I/O failures and strict-mode misses.
    pub async fn execute(self, settings: &RelocateConfig) -> Result<()> {
        ensure_directory(&self.dir)?;

        let matcher = PatternMatcher::new(self.pattern.as_deref().unwrap_or(&settings.pattern))?;
        let deps = self.deps.resolve(settings).await?;
        let mode = if self.strict {
            RelocationMode::Strict
        } else {
            settings.mode()
        };

        let mut relocator = Relocator::new(&deps, mode);
        if self.strip_sdk || settings.strip_sdk {
            relocator = relocator.with_sdk_stripping(SdkStripper::new()?);
        }

        let report = relocator.relocate_tree(&self.dir, &matcher)?;

        for file in report.files.iter().filter(|f| f.changed) {
            let mut line = format!(
                "{} {} ({} root reference(s)",
                "✓".green(),
                display_path(&file.path, &self.dir),
                file.replacements()
            );
            if file.sdk_paths_removed > 0 {
                line.push_str(&format!(", {} SDK path(s)", file.sdk_paths_removed));
            }
            line.push(')');
            println!("{line}");
        }

        println!(
            "Relocated {} root reference(s) in {} of {} file(s)",
            report.total_replacements(),
            report.changed_files().len(),
            report.files.len()
        );
        Ok(())
    }
}
