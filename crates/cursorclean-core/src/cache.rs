use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{format_error_chain, CoreError, CoreResult};

/// Result of one best-effort cleaning step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum StepOutcome {
    Skipped,
    Deleted,
    Failed(String),
}

impl StepOutcome {
    fn from_result(path: &Path, result: CoreResult<()>) -> Self {
        match result {
            Ok(()) => StepOutcome::Deleted,
            Err(err) => {
                let reason = format_error_chain(&err);
                warn!(path = %path.display(), error = %reason, "cleanup failed, continuing");
                StepOutcome::Failed(reason)
            }
        }
    }
}

/// Deletes cache locations. Every method is best-effort and never returns an error.
pub struct CacheManager {
    temp_patterns: GlobSet,
}

impl CacheManager {
    /// Builds the case-insensitive matcher for temp file names.
    pub fn new(temp_patterns: &[String]) -> CoreResult<Self> {
        Ok(Self {
            temp_patterns: compile_patterns(temp_patterns)?,
        })
    }

    /// Recursively removes `dir` if it exists.
    pub fn remove_dir(&self, dir: Option<&Path>) -> StepOutcome {
        let Some(dir) = dir.filter(|d| d.exists()) else {
            return StepOutcome::Skipped;
        };
        debug!(path = %dir.display(), "removing directory");
        let result = fs::remove_dir_all(dir).map_err(|source| CoreError::Remove {
            path: dir.to_path_buf(),
            source,
        });
        StepOutcome::from_result(dir, result)
    }

    /// Removes files directly inside `dir` whose names match the temp patterns.
    ///
    /// Skipped when the directory is missing or holds no matching file.
    pub fn purge_temp(&self, dir: Option<&Path>) -> StepOutcome {
        let Some(dir) = dir.filter(|d| d.is_dir()) else {
            return StepOutcome::Skipped;
        };
        match self.purge_matching(dir) {
            Ok(0) => StepOutcome::Skipped,
            result => StepOutcome::from_result(dir, result.map(|_| ())),
        }
    }

    pub fn matches(&self, file_name: &str) -> bool {
        self.temp_patterns.is_match(file_name)
    }

    fn purge_matching(&self, dir: &Path) -> CoreResult<usize> {
        let mut removed = 0usize;
        let mut first_error = None;
        let mut failures = 0usize;

        for entry in fs::read_dir(dir)? {
            let Ok(entry) = entry else { continue };
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(true);
            let name = entry.file_name();
            if is_dir || !self.matches(&name.to_string_lossy()) {
                continue;
            }
            let path = entry.path();
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(source) => {
                    failures += 1;
                    if first_error.is_none() {
                        first_error = Some(CoreError::Remove { path, source });
                    }
                }
            }
        }

        debug!(path = %dir.display(), removed, failures, "temp files purged");
        match first_error {
            Some(err) if failures == 1 => Err(err),
            Some(err) => Err(CoreError::Cleanup(format!(
                "{failures} temp files could not be removed, first: {}",
                format_error_chain(&err)
            ))),
            None => Ok(removed),
        }
    }
}

/// Compiles `del`-style wildcards: a trailing `*.*` also matches names without an extension.
fn compile_patterns(patterns: &[String]) -> CoreResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(GlobBuilder::new(pattern).case_insensitive(true).build()?);
        if let Some(stem) = pattern.strip_suffix("*.*") {
            let bare = format!("{stem}*");
            builder.add(GlobBuilder::new(&bare).case_insensitive(true).build()?);
        }
    }
    Ok(builder.build()?)
}
