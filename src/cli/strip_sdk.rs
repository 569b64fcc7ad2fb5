//! Standalone SDK stripping, for trees packaged outside the package step.

use crate::cli::{display_path, ensure_directory};
use crate::config::RelocateConfig;
use crate::pattern::PatternMatcher;
use crate::relocate::SdkStripper;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

/// Remove macOS SDK include paths from matching files.
#[derive(Args, Debug)]
pub struct StripSdkCommand {
    /// Directory to process
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Glob selecting files, relative to DIR (default: **/*.cmake)
    #[arg(long, value_name = "GLOB")]
    pub pattern: Option<String>,
}

impl StripSdkCommand {
    /// Strips the tree.
    ///
    /// # Errors
    ///
    /// Invalid pattern and I/O failures.
    pub fn execute(self, settings: &RelocateConfig) -> Result<()> {
        ensure_directory(&self.dir)?;

        let matcher = PatternMatcher::new(self.pattern.as_deref().unwrap_or(&settings.pattern))?;
        let changed = SdkStripper::new()?.strip_tree(&self.dir, &matcher)?;

        for (path, count) in &changed {
            println!("{} {} ({} SDK path(s))", "✓".green(), display_path(path, &self.dir), count);
        }
        println!(
            "Removed {} SDK path(s) from {} file(s)",
            changed.iter().map(|(_, n)| n).sum::<usize>(),
            changed.len()
        );
        Ok(())
    }
}
