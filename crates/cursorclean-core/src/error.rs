use std::error::Error;
use std::path::PathBuf;

use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid temp pattern: {0}")]
    Pattern(#[from] globset::Error),
    #[error("failed to remove {path}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("process error: {0}")]
    Process(String),
    #[error("cleanup error: {0}")]
    Cleanup(String),
}

/// Formats an error together with every `source()` below it.
pub fn format_error_chain<E: Error + ?Sized>(error: &E) -> String {
    let mut chain = vec![error.to_string()];
    let mut source = error.source();

    while let Some(err) = source {
        chain.push(format!("caused by: {}", err));
        source = err.source();
    }

    chain.join(": ")
}
