use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::builders::patterns::{BlockMatcher, IgnoreSet};
use crate::core::config::{FailurePolicy, StripperConfig};

/// What happened to a single file passed to [`StripEngine::strip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripOutcome {
    /// A block was found and removed.
    Stripped { removed_bytes: usize },
    /// No block was found. The file was still rewritten unless running dry.
    Unchanged,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StrippedFile {
    pub path: PathBuf,
    pub removed_bytes: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Everything a run did, in visiting order.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct RunSummary {
    pub dry_run: bool,
    pub failure_policy: String,
    /// Roots that were walked, including those abandoned after a failure.
    pub roots_scanned: Vec<PathBuf>,
    /// Roots that do not exist or are not directories.
    pub skipped_roots: Vec<PathBuf>,
    /// Roots whose walk stopped early because of a failure.
    pub abandoned_roots: Vec<PathBuf>,
    /// Files handed to `strip`, whatever the outcome.
    pub files_visited: usize,
    pub stripped: Vec<StrippedFile>,
    pub unchanged: usize,
    /// Files skipped because their base name is in the ignore set.
    pub ignored: usize,
    pub failures: Vec<FileFailure>,
    /// The run stopped at the first failure.
    pub aborted: bool,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn removed_bytes(&self) -> usize {
        self.stripped.iter().map(|f| f.removed_bytes).sum()
    }
}

/// Walks root directories and removes the copyright block from every file
/// that is not ignored.
///
/// Work is strictly sequential: one root after another, and each file's
/// read, strip and write completes before the next file is opened.
pub struct StripEngine {
    matcher: Box<dyn BlockMatcher>,
    ignored: IgnoreSet,
    failure_policy: FailurePolicy,
    dry_run: bool,
}

impl StripEngine {
    /// Creates an engine with the default [`FailurePolicy`] that writes
    /// every visited file.
    ///
    /// # Arguments
    /// * `matcher`: Locates the block to remove in each file's content.
    /// * `ignored`: Base names that are never opened.
    pub fn new(matcher: impl BlockMatcher + 'static, ignored: IgnoreSet) -> Self {
        Self {
            matcher: Box::new(matcher),
            ignored,
            failure_policy: FailurePolicy::default(),
            dry_run: false,
        }
    }

    /// Builds an engine from the markers, ignore list and global settings of
    /// a configuration.
    pub fn from_config(config: &StripperConfig) -> Result<Self> {
        let engine = Self::new(config.marker_block()?, config.ignore_set())
            .with_failure_policy(config.global_settings.failure_policy)
            .with_dry_run(config.global_settings.dry_run);
        Ok(engine)
    }

    /// Sets what happens when a file cannot be read or written.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// When `true`, outcomes are computed and reported but no file is written.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The base names this engine skips.
    pub fn ignored(&self) -> &IgnoreSet {
        &self.ignored
    }

    /// Removes the first copyright block from `path` and writes the result
    /// back in place.
    ///
    /// The file is rewritten even when no block is found, so the write side
    /// of the contract holds for every eligible file. In dry-run mode the
    /// outcome is computed but nothing is written.
    ///
    /// # Errors
    /// Fails when the file cannot be read as UTF-8 text or cannot be written.
    /// Binary content is not detected up front and surfaces here as a read error.
    pub fn strip(&self, path: &Path) -> Result<StripOutcome> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let result = self.matcher.strip_first(&content);
        let outcome = if result.is_stripped() {
            StripOutcome::Stripped {
                removed_bytes: result.removed_bytes(),
            }
        } else {
            StripOutcome::Unchanged
        };

        if !self.dry_run {
            fs::write(path, result.content.as_bytes())
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }

        Ok(outcome)
    }

    /// Visits every file below each root, in order, and strips those whose
    /// base name is not ignored.
    ///
    /// Missing roots are skipped with a warning. File-level failures are
    /// recorded in the summary and then handled according to the engine's
    /// [`FailurePolicy`], so the walk itself never fails: an aborted run is
    /// reported through [`RunSummary::aborted`].
    ///
    /// Symbolic links to files are stripped through the link, which rewrites
    /// the target. Symbolic links to directories are not descended into, and
    /// dangling links are recorded as failures.
    ///
    /// # Arguments
    /// * `roots`: Directories to walk, in order.
    ///
    /// # Returns
    /// A [`RunSummary`] describing every file visited, ignored or failed.
    pub fn process_directories(&self, roots: &[PathBuf]) -> RunSummary {
        let mut summary = RunSummary {
            dry_run: self.dry_run,
            failure_policy: self.failure_policy.to_string(),
            ..RunSummary::default()
        };

        for root in roots {
            if !root.is_dir() {
                warn!("Skipping {}: not a directory", root.display());
                summary.skipped_roots.push(root.clone());
                continue;
            }

            info!("Scanning {}", root.display());
            summary.roots_scanned.push(root.clone());

            let keep_going = self.process_root(root, &mut summary);
            if summary.aborted {
                error!("Aborting run after failure in {}", root.display());
                break;
            }
            if !keep_going {
                warn!("Abandoning remaining files in {}", root.display());
                summary.abandoned_roots.push(root.clone());
            }
        }

        info!(
            "Visited {} files: {} stripped, {} unchanged, {} ignored, {} failed",
            summary.files_visited,
            summary.stripped.len(),
            summary.unchanged,
            summary.ignored,
            summary.failures.len()
        );

        summary
    }

    /// Walks a single root. Returns `false` when the walk stopped early.
    fn process_root(&self, root: &Path, summary: &mut RunSummary) -> bool {
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    if !self.record_failure(summary, path, e.to_string()) {
                        return false;
                    }
                    continue;
                }
            };

            let path = entry.path();
            if entry.path_is_symlink() {
                match fs::metadata(path) {
                    Ok(target) if target.is_file() => {
                        debug!("Following file symlink {}", path.display());
                    }
                    Ok(_) => continue,
                    Err(_) if self.ignored.is_ignored(path) => {}
                    Err(e) => {
                        let error = format!("Broken symlink {}: {e}", path.display());
                        if !self.record_failure(summary, path.to_path_buf(), error) {
                            return false;
                        }
                        continue;
                    }
                }
            } else if !entry.file_type().is_file() {
                continue;
            }

            if self.ignored.is_ignored(path) {
                debug!("Ignoring {}", path.display());
                summary.ignored += 1;
                continue;
            }

            summary.files_visited += 1;
            match self.strip(path) {
                Ok(StripOutcome::Stripped { removed_bytes }) => {
                    debug!("Stripped {removed_bytes} bytes from {}", path.display());
                    summary.stripped.push(StrippedFile {
                        path: path.to_path_buf(),
                        removed_bytes,
                    });
                }
                Ok(StripOutcome::Unchanged) => {
                    debug!("No copyright block in {}", path.display());
                    summary.unchanged += 1;
                }
                Err(e) => {
                    if !self.record_failure(summary, path.to_path_buf(), format!("{e:#}")) {
                        return false;
                    }
                }
            }
        }

        true
    }

    /// Records a failure and reports whether the current root should go on.
    fn record_failure(&self, summary: &mut RunSummary, path: PathBuf, error: String) -> bool {
        warn!("{error}");
        summary.failures.push(FileFailure { path, error });

        match self.failure_policy {
            FailurePolicy::Abort => {
                summary.aborted = true;
                false
            }
            FailurePolicy::SkipRoot => false,
            FailurePolicy::SkipFile => true,
        }
    }
}
