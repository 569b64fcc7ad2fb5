//! Build-metadata relocation.
//!
//! After the install step, VTK's generated CMake files reference dependencies
//! through the absolute directories they were installed to on the build
//! machine, for example
//! `/home/build/.conan/data/zlib/1.2.11/_/_/package/abcd1234/include`. Those
//! directories do not exist where the package is consumed. The relocator
//! rewrites every such root into a placeholder token,
//! `${CONAN_ZLIB_ROOT}/include`, which the consumer's CMake integration
//! defines.
//!
//! # Matching rules
//!
//! - Roots are normalized to forward slashes. The original backslash spelling
//!   is searched as well when it differs.
//! - A match counts only when it is a whole path prefix: it must not continue
//!   a longer path on the left, and the character after it must not continue
//!   the last component. `/opt/zlib` never rewrites `/opt/zlib2` or
//!   `/mnt/opt/zlib`. Flags glued to the root, as in `-L/opt/zlib/lib`, are
//!   not part of the path.
//! - Dependencies are substituted longest root first (see
//!   [`DependencySet::by_specificity`]), so a root nested inside another
//!   dependency's root cannot corrupt the longer path.
//!
//! # Modes
//!
//! In [`RelocationMode::NonStrict`] a root that does not occur in a file is a
//! no-op. In [`RelocationMode::Strict`] it is a [`VtkpkgError::PathNotFound`]
//! error unless the file already carries the dependency's token, which keeps
//! strict runs idempotent.
//!
//! # Examples
//!
//! ```rust,no_run
//! use vtkpkg::pattern::PatternMatcher;
//! use vtkpkg::relocate::{DependencyDescriptor, DependencySet, RelocationMode, Relocator};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let mut deps = DependencySet::new();
//! deps.insert(DependencyDescriptor::new(
//!     "zlib",
//!     "/home/build/.conan/data/zlib/1.2.11/_/_/package/abcd1234",
//! )?)?;
//!
//! let relocator = Relocator::new(&deps, RelocationMode::NonStrict);
//! let report = relocator.relocate_tree(Path::new("package"), &PatternMatcher::new("**/*.cmake")?)?;
//! println!("{} file(s) rewritten", report.changed_files().len());
//! # Ok(())
//! # }
//! ```

pub mod sdk;


pub use sdk::SdkStripper;

use crate::constants::{TOKEN_PREFIX, TOKEN_SUFFIX};
use crate::core::VtkpkgError;
use crate::pattern::PatternMatcher;
use crate::utils::fs::{atomic_write, read_text_file};
use crate::utils::platform::{is_absolute_root, is_component_char, normalize_root};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

/// Derives the placeholder token for a dependency name.
///
/// The name is uppercased and every character outside `[A-Z0-9_]` becomes `_`:
/// `zlib` → `${CONAN_ZLIB_ROOT}`, `open-ssl` → `${CONAN_OPEN_SSL_ROOT}`.
/// Distinct names can therefore share a token; [`DependencySet`] refuses to
/// hold two of them.
#[must_use]
pub fn placeholder_token(name: &str) -> String {
    let upper: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{TOKEN_PREFIX}{upper}{TOKEN_SUFFIX}")
}

/// A dependency's logical name and its install root on the build machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyDescriptor {
    name: String,
    root: String,
    native_root: Option<String>,
    token: String,
}

impl DependencyDescriptor {
    /// Validates and normalizes a descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`VtkpkgError::InvalidRoot`] when the name is empty, the root
    /// is not absolute, or the root is the filesystem root itself.
    pub fn new(name: impl Into<String>, root: impl AsRef<str>) -> Result<Self, VtkpkgError> {
        let name = name.into();
        let raw = root.as_ref();
        let invalid = |reason: &str| VtkpkgError::InvalidRoot {
            name: name.clone(),
            root: raw.to_string(),
            reason: reason.to_string(),
        };

        if name.trim().is_empty() {
            return Err(invalid("dependency name is empty"));
        }

        let normalized = normalize_root(raw);
        if normalized.is_empty() {
            return Err(invalid("root is empty"));
        }
        if !is_absolute_root(&normalized) {
            return Err(invalid("root is not an absolute path"));
        }
        if normalized == "/" {
            return Err(invalid("root is a filesystem root"));
        }

        let native = raw.trim().trim_end_matches(['/', '\\']);
        let native_root = (native != normalized).then(|| native.to_string());
        let token = placeholder_token(&name);

        Ok(Self {
            name,
            root: normalized,
            native_root,
            token,
        })
    }

    /// Logical dependency name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Install root with forward slashes and no trailing separator.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// The dependency's placeholder token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Every spelling of the root searched for in generated files.
    pub fn search_forms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.root.as_str()).chain(self.native_root.as_deref())
    }
}

/// The dependencies of the current build configuration, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct DependencySet {
    dependencies: BTreeMap<String, DependencyDescriptor>,
}

impl DependencySet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from `(name, root)` pairs.
    ///
    /// # Errors
    ///
    /// Fails on the first invalid descriptor.
    pub fn from_pairs<I, N, R>(pairs: I) -> Result<Self, VtkpkgError>
    where
        I: IntoIterator<Item = (N, R)>,
        N: Into<String>,
        R: AsRef<str>,
    {
        let mut set = Self::new();
        for (name, root) in pairs {
            set.insert(DependencyDescriptor::new(name, root)?)?;
        }
        Ok(set)
    }

    /// Adds a descriptor, replacing any previous one with the same name.
    ///
    /// # Errors
    ///
    /// [`VtkpkgError::TokenCollision`] when a dependency with a different
    /// name already maps to the same placeholder token.
    pub fn insert(
        &mut self,
        descriptor: DependencyDescriptor,
    ) -> Result<Option<DependencyDescriptor>, VtkpkgError> {
        if let Some(existing) =
            self.dependencies.values().find(|d| d.token == descriptor.token && d.name != descriptor.name)
        {
            return Err(VtkpkgError::TokenCollision {
                name: descriptor.name,
                existing: existing.name.clone(),
                token: descriptor.token,
            });
        }
        Ok(self.dependencies.insert(descriptor.name.clone(), descriptor))
    }

    /// Merges `other` into `self`; entries from `other` win.
    ///
    /// # Errors
    ///
    /// [`VtkpkgError::TokenCollision`] as for [`DependencySet::insert`].
    pub fn extend(&mut self, other: Self) -> Result<(), VtkpkgError> {
        for descriptor in other.dependencies.into_values() {
            self.insert(descriptor)?;
        }
        Ok(())
    }

    /// Looks a dependency up by logical name.
    pub fn get(&self, name: &str) -> Option<&DependencyDescriptor> {
        self.dependencies.get(name)
    }

    /// Returns true if `name` is part of the configuration.
    pub fn contains(&self, name: &str) -> bool {
        self.dependencies.contains_key(name)
    }

    /// Number of dependencies.
    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    /// Returns true if the set has no dependencies.
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Dependencies in name order.
    pub fn iter(&self) -> impl Iterator<Item = &DependencyDescriptor> {
        self.dependencies.values()
    }

    /// Dependencies in substitution order: longest root first, then by name.
    ///
    /// A root that is a prefix of another root therefore always comes after
    /// it.
    pub fn by_specificity(&self) -> Vec<&DependencyDescriptor> {
        let mut ordered: Vec<_> = self.dependencies.values().collect();
        ordered.sort_by(|a, b| b.root.len().cmp(&a.root.len()).then_with(|| a.name.cmp(&b.name)));
        ordered
    }
}

/// How to treat a dependency root that does not occur in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelocationMode {
    /// The root is structurally guaranteed to be present; absence is fatal.
    Strict,
    /// Presence is conditional; absence is a no-op.
    #[default]
    NonStrict,
}

/// What happened to one dependency in one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "count", rename_all = "kebab-case")]
pub enum Outcome {
    /// The root was replaced this many times.
    Replaced(usize),
    /// No root left, but the token is present from an earlier run.
    AlreadyRelocated,
    /// Neither root nor token found (non-strict mode only).
    NotPresent,
    /// The dependency is not part of the current configuration.
    NotApplicable,
}

/// Result of relocating a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// The file that was processed
    pub path: PathBuf,
    /// Per-dependency outcomes in processing order
    pub outcomes: Vec<(String, Outcome)>,
    /// SDK include paths removed from this file
    pub sdk_paths_removed: usize,
    /// Whether the file was rewritten
    pub changed: bool,
}

impl FileReport {
    /// Total root replacements in this file.
    pub fn replacements(&self) -> usize {
        self.outcomes
            .iter()
            .map(|(_, outcome)| match outcome {
                Outcome::Replaced(n) => *n,
                _ => 0,
            })
            .sum()
    }

    /// Outcome recorded for `dependency`, if it was processed.
    pub fn outcome(&self, dependency: &str) -> Option<Outcome> {
        self.outcomes.iter().find(|(name, _)| name == dependency).map(|(_, outcome)| *outcome)
    }
}

/// Aggregated result of a relocation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RelocationReport {
    /// Per-file results in processing order
    pub files: Vec<FileReport>,
}

impl RelocationReport {
    /// Files whose content changed.
    pub fn changed_files(&self) -> Vec<&Path> {
        self.files.iter().filter(|f| f.changed).map(|f| f.path.as_path()).collect()
    }

    /// Total root replacements across all files.
    pub fn total_replacements(&self) -> usize {
        self.files.iter().map(FileReport::replacements).sum()
    }

    /// Total SDK include paths removed across all files.
    pub fn total_sdk_paths_removed(&self) -> usize {
        self.files.iter().map(|f| f.sdk_paths_removed).sum()
    }
}

/// One file of a package step's relocation plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fixup {
    /// Path relative to the package folder
    pub file: PathBuf,
    /// Dependencies whose roots the file references
    pub dependencies: Vec<String>,
    /// Whether the references are guaranteed to be there
    pub mode: RelocationMode,
}

/// A dependency root or SDK include path that survived relocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leftover {
    /// File containing the reference
    pub path: PathBuf,
    /// Dependency whose root remains; `None` for SDK include paths
    pub dependency: Option<String>,
    /// Number of occurrences
    pub count: usize,
}

/// Returns true if a root starting right after `before` would be the tail
/// of a longer path rather than a path of its own.
///
/// A separator right before the match continues a path, and so does any
/// other glued component (`mnt` in `/mnt/opt/zlib`, `x` in `x/opt/zlib`).
/// A compiler flag glued to the root (`-L`, `-I`, `-isystem`) does not.
fn continues_path(before: &str) -> bool {
    let prefix = before.trim_end_matches(is_component_char);
    if prefix.ends_with(['/', '\\']) {
        return true;
    }
    let glued = &before[prefix.len()..];
    !glued.is_empty() && !glued.starts_with('-')
}

/// Replaces every boundary-respecting occurrence of `needle` in `text`.
///
/// Returns the new text and the number of replacements.
fn replace_bounded(text: &str, needle: &str, replacement: &str) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut search_from = 0;
    let mut count = 0;

    while let Some(offset) = text[search_from..].find(needle) {
        let start = search_from + offset;
        let end = start + needle.len();

        let after_ok = text[end..].chars().next().is_none_or(|c| !is_component_char(c));

        if !continues_path(&text[..start]) && after_ok {
            out.push_str(&text[last..start]);
            out.push_str(replacement);
            last = end;
            search_from = end;
            count += 1;
        } else {
            trace!("Skipping partial match of '{}' at byte {}", needle, start);
            search_from = start + text[start..].chars().next().map_or(1, char::len_utf8);
        }
    }

    out.push_str(&text[last..]);
    (out, count)
}

/// Replaces every occurrence of the descriptor's root with its token.
///
/// Returns the new text and the number of replacements.
#[must_use]
pub fn substitute(text: &str, descriptor: &DependencyDescriptor) -> (String, usize) {
    let mut current = text.to_string();
    let mut total = 0;
    for form in descriptor.search_forms() {
        let (next, count) = replace_bounded(&current, form, descriptor.token());
        current = next;
        total += count;
    }
    (current, total)
}

/// Counts the occurrences of the descriptor's root that [`substitute`] would
/// replace.
#[must_use]
pub fn count_occurrences(text: &str, descriptor: &DependencyDescriptor) -> usize {
    descriptor
        .search_forms()
        .map(|form| replace_bounded(text, form, descriptor.token()).1)
        .sum()
}

/// Applies dependency substitutions (and optionally SDK stripping) to files.
#[derive(Debug)]
pub struct Relocator<'a> {
    dependencies: &'a DependencySet,
    mode: RelocationMode,
    sdk: Option<SdkStripper>,
}

impl<'a> Relocator<'a> {
    /// Creates a relocator over the current configuration's dependencies.
    pub fn new(dependencies: &'a DependencySet, mode: RelocationMode) -> Self {
        Self {
            dependencies,
            mode,
            sdk: None,
        }
    }

    /// Also removes macOS SDK include paths from every processed file.
    pub fn with_sdk_stripping(mut self, stripper: SdkStripper) -> Self {
        self.sdk = Some(stripper);
        self
    }

    /// Default mode for tree relocation.
    pub fn mode(&self) -> RelocationMode {
        self.mode
    }

    /// Relocates text in memory.
    ///
    /// `names` restricts processing to the given dependencies; names missing
    /// from the configuration are reported as [`Outcome::NotApplicable`].
    /// `None` processes every dependency. `label` names the text in errors.
    ///
    /// # Errors
    ///
    /// [`VtkpkgError::PathNotFound`] in strict mode.
    pub fn relocate_text(
        &self,
        text: &str,
        names: Option<&[String]>,
        mode: RelocationMode,
        label: &str,
    ) -> Result<(String, Vec<(String, Outcome)>), VtkpkgError> {
        let mut outcomes = Vec::new();

        let selected: Vec<&DependencyDescriptor> = match names {
            Some(names) => {
                for name in names.iter().filter(|n| !self.dependencies.contains(n)) {
                    debug!("Dependency '{}' is not part of this configuration, skipping", name);
                    outcomes.push((name.clone(), Outcome::NotApplicable));
                }
                self.dependencies
                    .by_specificity()
                    .into_iter()
                    .filter(|d| names.iter().any(|n| n == d.name()))
                    .collect()
            }
            None => self.dependencies.by_specificity(),
        };

        let mut current = text.to_string();
        for descriptor in selected {
            let (next, count) = substitute(&current, descriptor);
            current = next;

            let outcome = if count > 0 {
                Outcome::Replaced(count)
            } else if current.contains(descriptor.token()) {
                Outcome::AlreadyRelocated
            } else if mode == RelocationMode::Strict {
                return Err(VtkpkgError::PathNotFound {
                    dependency: descriptor.name().to_string(),
                    root: descriptor.root().to_string(),
                    file: label.to_string(),
                });
            } else {
                Outcome::NotPresent
            };

            trace!("{}: {} -> {:?}", label, descriptor.name(), outcome);
            outcomes.push((descriptor.name().to_string(), outcome));
        }

        Ok((current, outcomes))
    }

    /// Relocates one file in place.
    ///
    /// The file is rewritten only when its content changed.
    ///
    /// # Errors
    ///
    /// I/O failures and strict-mode misses are fatal.
    pub fn relocate_file(
        &self,
        path: &Path,
        names: Option<&[String]>,
        mode: RelocationMode,
    ) -> Result<FileReport> {
        let content = read_text_file(path, "relocating dependency roots")?;
        let label = path.display().to_string();

        let (mut relocated, outcomes) = self.relocate_text(&content, names, mode, &label)?;

        let mut sdk_paths_removed = 0;
        if let Some(stripper) = &self.sdk {
            let (stripped, count) = stripper.strip(&relocated);
            relocated = stripped;
            sdk_paths_removed = count;
        }

        let changed = relocated != content;
        if changed {
            atomic_write(path, relocated.as_bytes())?;
            debug!("Relocated {}", path.display());
        }

        Ok(FileReport {
            path: path.to_path_buf(),
            outcomes,
            sdk_paths_removed,
            changed,
        })
    }

    /// Relocates every file under `root` matching `matcher`, against every
    /// dependency, in the relocator's default mode.
    ///
    /// # Errors
    ///
    /// The first fatal error aborts the run; files processed before it stay
    /// rewritten.
    pub fn relocate_tree(&self, root: &Path, matcher: &PatternMatcher) -> Result<RelocationReport> {
        if self.dependencies.is_empty() {
            warn!("No dependencies configured; only SDK paths will be considered");
        }

        debug!("Relocating files matching '{}' under {}", matcher.pattern(), root.display());
        let mut report = RelocationReport::default();
        for file in matcher.find_matches(root)? {
            report.files.push(self.relocate_file(&file, None, self.mode)?);
        }

        info!(
            "Relocated {} root reference(s) in {} of {} file(s)",
            report.total_replacements(),
            report.changed_files().len(),
            report.files.len()
        );
        Ok(report)
    }

    /// Runs a package step's fixups, each file in its own mode.
    ///
    /// # Errors
    ///
    /// A missing fixup file, an I/O failure, or a strict-mode miss is fatal.
    pub fn apply_fixups(&self, root: &Path, fixups: &[Fixup]) -> Result<RelocationReport> {
        let mut report = RelocationReport::default();
        for fixup in fixups {
            let path = root.join(&fixup.file);
            debug!("Fixing {} for {:?}", fixup.file.display(), fixup.dependencies);
            report.files.push(self.relocate_file(&path, Some(&fixup.dependencies), fixup.mode)?);
        }

        info!(
            "Applied {} fixup(s): {} root reference(s) relocated",
            fixups.len(),
            report.total_replacements()
        );
        Ok(report)
    }

    /// Lists every dependency root (and, with SDK stripping enabled, every
    /// SDK include path) still present in files under `root`.
    ///
    /// Files are only read, never rewritten.
    ///
    /// # Errors
    ///
    /// Traversal and read failures are fatal.
    pub fn verify_tree(&self, root: &Path, matcher: &PatternMatcher) -> Result<Vec<Leftover>> {
        let mut leftovers = Vec::new();
        let files = matcher.find_matches(root)?;

        for file in &files {
            let content = read_text_file(file, "verifying relocation")?;

            for descriptor in self.dependencies.by_specificity() {
                let count = count_occurrences(&content, descriptor);
                if count > 0 {
                    leftovers.push(Leftover {
                        path: file.clone(),
                        dependency: Some(descriptor.name().to_string()),
                        count,
                    });
                }
            }

            if let Some(stripper) = &self.sdk {
                let count = stripper.count(&content);
                if count > 0 {
                    leftovers.push(Leftover {
                        path: file.clone(),
                        dependency: None,
                        count,
                    });
                }
            }
        }

        info!("Verified {} file(s): {} leftover reference(s)", files.len(), leftovers.len());
        Ok(leftovers)
    }
}
