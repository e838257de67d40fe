use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::cache::{CacheManager, StepOutcome};
use crate::config::CleanerConfig;
use crate::error::CoreResult;
use crate::paths::PathSet;
use crate::process::{terminate, ProcessTable, Termination};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Cache,
    Extensions,
    Temp,
}

impl Step {
    fn label(self) -> &'static str {
        match self {
            Step::Cache => "cache directory",
            Step::Extensions => "extensions directory",
            Step::Temp => "temp files",
        }
    }

    fn skip_line(self, path: Option<&Path>, shown: &str) -> String {
        match self {
            Step::Temp if path.is_some_and(Path::is_dir) => {
                format!("[skip] no matching temp files in {shown}")
            }
            Step::Temp => format!("[skip] temp directory not found: {shown}"),
            _ => format!("[skip] {} not found: {shown}", self.label()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: Step,
    pub path: Option<PathBuf>,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub termination: Termination,
    pub steps: Vec<StepReport>,
}

impl CleanReport {
    pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
        self.steps.iter().find(|r| r.step == step).map(|r| &r.outcome)
    }

    pub fn all_skipped(&self) -> bool {
        self.termination == Termination::NotRunning
            && self.steps.iter().all(|r| r.outcome == StepOutcome::Skipped)
    }
}

/// Stops the target process, then clears its cache, extensions and temp files.
pub struct Cleaner<P> {
    table: P,
    config: CleanerConfig,
    paths: PathSet,
    cache: CacheManager,
}

impl<P: ProcessTable> Cleaner<P> {
    pub fn new(table: P, config: CleanerConfig, paths: PathSet) -> CoreResult<Self> {
        let cache = CacheManager::new(&config.temp_patterns)?;
        Ok(Self {
            table,
            config,
            paths,
            cache,
        })
    }

    /// Runs every step in order, writing one status line per step to `out`.
    ///
    /// Never fails: write errors on `out` and step failures are both swallowed.
    pub fn run<W: Write>(&self, out: &mut W) -> CleanReport {
        if let Ok(plan) = serde_json::to_string(&self.config) {
            debug!(config = %plan, "starting cleanup");
        }

        let name = &self.config.process_name;
        let termination = terminate(&self.table, name, self.config.settle_delay());
        let _ = match &termination {
            Termination::NotRunning => writeln!(out, "[skip] {name} is not running"),
            Termination::Killed(_) | Termination::KillFailed(_) => {
                writeln!(out, "[done] stopped {name}")
            }
        };

        let steps = vec![
            self.step(out, Step::Cache, self.paths.cache_dir.as_deref(), |c, p| {
                c.remove_dir(p)
            }),
            self.step(
                out,
                Step::Extensions,
                self.paths.extensions_dir.as_deref(),
                |c, p| c.remove_dir(p),
            ),
            self.step(out, Step::Temp, self.paths.temp_dir.as_deref(), |c, p| {
                c.purge_temp(p)
            }),
        ];

        let _ = writeln!(out, "Cleanup complete.");
        let report = CleanReport { termination, steps };
        if let Ok(json) = serde_json::to_string(&report) {
            debug!(report = %json, "cleanup finished");
        }
        report
    }

    fn step<W: Write>(
        &self,
        out: &mut W,
        step: Step,
        path: Option<&Path>,
        action: impl FnOnce(&CacheManager, Option<&Path>) -> StepOutcome,
    ) -> StepReport {
        let outcome = action(&self.cache, path);
        let shown = path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<unresolved>".to_string());
        let _ = match outcome {
            StepOutcome::Skipped => writeln!(out, "{}", step.skip_line(path, &shown)),
            StepOutcome::Deleted | StepOutcome::Failed(_) => {
                writeln!(out, "[done] cleaned {}: {shown}", step.label())
            }
        };
        info!(step = step.label(), outcome = ?outcome, "step finished");
        StepReport {
            step,
            path: path.map(Path::to_path_buf),
            outcome,
        }
    }
}
