//! Post-relocation verification.
//!
//! Succeeds only when no matching file still contains a configured
//! dependency root or a macOS SDK include path. Nothing is rewritten.

use crate::cli::{DependencyArgs, OutputFormat, display_path, ensure_directory};
use crate::config::RelocateConfig;
use crate::core::VtkpkgError;
use crate::pattern::PatternMatcher;
use crate::relocate::{Leftover, RelocationMode, Relocator, SdkStripper};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

/// Verify that relocation left no absolute paths behind.
#[derive(Args, Debug)]
pub struct CheckCommand {
    /// Directory to verify
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Glob selecting files, relative to DIR (default: **/*.cmake)
    #[arg(long, value_name = "GLOB")]
    pub pattern: Option<String>,

    #[command(flatten)]
    pub deps: DependencyArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct CheckResult<'a> {
    valid: bool,
    dependencies: usize,
    leftovers: &'a [Leftover],
}

impl CheckCommand {
    /// Runs the verification.
    ///
    /// # Errors
    ///
    /// [`VtkpkgError::UnrelocatedPaths`] when anything remains, plus invalid
    /// inputs and I/O failures.
    pub async fn execute(self, settings: &RelocateConfig) -> Result<()> {
        ensure_directory(&self.dir)?;

        let matcher = PatternMatcher::new(self.pattern.as_deref().unwrap_or(&settings.pattern))?;
        let deps = self.deps.resolve(settings).await?;
        let relocator = Relocator::new(&deps, RelocationMode::NonStrict)
            .with_sdk_stripping(SdkStripper::new()?);

        let leftovers = relocator.verify_tree(&self.dir, &matcher)?;

        match self.format {
            OutputFormat::Json => {
                let result = CheckResult {
                    valid: leftovers.is_empty(),
                    dependencies: deps.len(),
                    leftovers: &leftovers,
                };
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            OutputFormat::Text => {
                for leftover in &leftovers {
                    let what = leftover.dependency.as_deref().map_or_else(
                        || "SDK include path".to_string(),
                        |name| format!("root of '{name}'"),
                    );
                    println!(
                        "{} {}: {} x{}",
                        "✗".red(),
                        display_path(&leftover.path, &self.dir),
                        what,
                        leftover.count
                    );
                }
                if leftovers.is_empty() {
                    println!("{} No absolute dependency paths remain", "✓".green());
                }
            }
        }

        if leftovers.is_empty() {
            Ok(())
        } else {
            Err(VtkpkgError::UnrelocatedPaths {
                count: leftovers.iter().map(|l| l.count).sum(),
            }
            .into())
        }
    }
}
