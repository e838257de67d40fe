use std::io::{self, BufRead, Write};

use cursorclean_core::logging::init_logging;
use cursorclean_core::{Cleaner, CleanerConfig, PathSet, ProcessManager};
use tracing::{debug, error};

fn main() {
    init_logging();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    finish(run(&mut out), &mut out);
    drop(out);
    wait_for_ack();
}

fn run<W: Write>(out: &mut W) -> anyhow::Result<()> {
    let config = CleanerConfig::default();
    let paths = PathSet::resolve(&config);
    debug!(?paths, "resolved targets");

    let cleaner = Cleaner::new(ProcessManager::new(), config, paths)?;
    cleaner.run(out);
    Ok(())
}

/// A run that could not start still ends with the completion line.
fn finish<W: Write>(result: anyhow::Result<()>, out: &mut W) {
    if let Err(err) = result {
        error!(error = %format!("{err:#}"), "cleanup could not start");
        let _ = writeln!(out, "Cleanup complete.");
    }
}

/// Keeps a double-clicked console window open until the user has read the output.
fn wait_for_ack() {
    print!("Press Enter to exit...");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}
