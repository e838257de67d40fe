use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[cfg(target_os = "windows")]
pub const PROCESS_NAME: &str = "Cursor.exe";
#[cfg(not(target_os = "windows"))]
pub const PROCESS_NAME: &str = "Cursor";

pub const SETTLE_DELAY_MS: u64 = 2000;

/// Fixed templates the cleaner works from. Only [`Default`] is used by the binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanerConfig {
    pub process_name: String,
    pub settle_delay_ms: u64,
    /// Joined onto the local application data root.
    pub cache_suffix: PathBuf,
    /// Joined onto the user profile root.
    pub extensions_suffix: PathBuf,
    pub temp_patterns: Vec<String>,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            process_name: PROCESS_NAME.to_string(),
            settle_delay_ms: SETTLE_DELAY_MS,
            cache_suffix: PathBuf::from("Cursor"),
            extensions_suffix: PathBuf::from(".cursor").join("extensions"),
            temp_patterns: vec!["cursor*.*".to_string(), "*cursor*.*".to_string()],
        }
    }
}

impl CleanerConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}
