use serde::Serialize;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::config::CleanerConfig;

/// The three targets of a run. `None` means the base directory could not be resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PathSet {
    pub cache_dir: Option<PathBuf>,
    pub extensions_dir: Option<PathBuf>,
    pub temp_dir: Option<PathBuf>,
}

impl PathSet {
    /// Resolves against the process environment, falling back to the platform directories.
    pub fn resolve(cfg: &CleanerConfig) -> Self {
        Self::from_lookup(cfg, |key| std::env::var_os(key))
    }

    pub fn from_lookup<F>(cfg: &CleanerConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);

        let local_data = var("LOCALAPPDATA").or_else(dirs::data_local_dir);
        let profile = var("USERPROFILE").or_else(dirs::home_dir);
        let temp = var("TEMP")
            .or_else(|| var("TMP"))
            .unwrap_or_else(std::env::temp_dir);

        Self {
            cache_dir: local_data.map(|root| root.join(&cfg.cache_suffix)),
            extensions_dir: profile.map(|root| root.join(&cfg.extensions_suffix)),
            temp_dir: Some(temp),
        }
    }
}
