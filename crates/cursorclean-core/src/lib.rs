pub mod cache;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod logging;
pub mod paths;
pub mod process;

pub use cache::{CacheManager, StepOutcome};
pub use cleaner::{CleanReport, Cleaner, Step, StepReport};
pub use config::CleanerConfig;
pub use error::{CoreError, CoreResult};
pub use paths::PathSet;
pub use process::{ProcessManager, ProcessTable, Termination};
