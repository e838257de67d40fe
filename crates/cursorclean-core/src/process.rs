use serde::Serialize;
use std::time::Duration;
use sysinfo::{Signal, System};
use tracing::{debug, info, warn};

use crate::error::{format_error_chain, CoreError, CoreResult};

/// Outcome of the termination step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Termination {
    NotRunning,
    Killed(usize),
    KillFailed(String),
}

/// Access to the OS process list, by exact executable name.
pub trait ProcessTable {
    fn is_running(&self, name: &str) -> bool;

    /// Forcibly kills every process called `name`, returning how many were signalled.
    fn kill_all(&self, name: &str) -> CoreResult<usize>;
}

impl<T: ProcessTable + ?Sized> ProcessTable for &T {
    fn is_running(&self, name: &str) -> bool {
        (**self).is_running(name)
    }

    fn kill_all(&self, name: &str) -> CoreResult<usize> {
        (**self).kill_all(name)
    }
}

/// [`ProcessTable`] backed by a fresh `sysinfo` snapshot per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessManager;

impl ProcessManager {
    pub fn new() -> Self {
        Self
    }

    fn snapshot() -> System {
        let mut sys = System::new();
        sys.refresh_processes();
        sys
    }
}

impl ProcessTable for ProcessManager {
    fn is_running(&self, name: &str) -> bool {
        let sys = Self::snapshot();
        let found = sys.processes_by_exact_name(name).next().is_some();
        found
    }

    fn kill_all(&self, name: &str) -> CoreResult<usize> {
        let sys = Self::snapshot();
        let mut matched = 0usize;
        let mut killed = 0usize;
        for process in sys.processes_by_exact_name(name) {
            matched += 1;
            // Signal::Kill is unsupported on some targets; kill() maps to TerminateProcess there.
            let sent = process
                .kill_with(Signal::Kill)
                .unwrap_or_else(|| process.kill());
            debug!(pid = process.pid().as_u32(), sent, "kill signal");
            if sent {
                killed += 1;
            }
        }
        if matched > 0 && killed == 0 {
            return Err(CoreError::Process(format!(
                "none of {matched} {name} process(es) accepted the kill signal"
            )));
        }
        Ok(killed)
    }
}

/// Kills the target if it is running and then waits `settle` so file handles are released.
pub fn terminate<P: ProcessTable + ?Sized>(
    table: &P,
    name: &str,
    settle: Duration,
) -> Termination {
    if !table.is_running(name) {
        debug!(process = name, "not running");
        return Termination::NotRunning;
    }

    let outcome = match table.kill_all(name) {
        Ok(count) => {
            info!(process = name, count, "terminated");
            Termination::Killed(count)
        }
        Err(err) => {
            let reason = format_error_chain(&err);
            warn!(process = name, error = %reason, "termination failed, continuing");
            Termination::KillFailed(reason)
        }
    };

    if !settle.is_zero() {
        std::thread::sleep(settle);
    }
    outcome
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::cell::RefCell;

    /// In-memory process list; records every call so tests can check ordering.
    #[derive(Default)]
    pub struct FakeProcessTable {
        pub running: RefCell<Vec<String>>,
        pub refuse_kill: bool,
        pub calls: RefCell<Vec<String>>,
    }

    impl FakeProcessTable {
        pub fn with_running(names: &[&str]) -> Self {
            Self {
                running: RefCell::new(names.iter().map(|n| n.to_string()).collect()),
                ..Self::default()
            }
        }
    }

    impl ProcessTable for FakeProcessTable {
        fn is_running(&self, name: &str) -> bool {
            self.calls.borrow_mut().push(format!("query {name}"));
            self.running.borrow().iter().any(|n| n == name)
        }

        fn kill_all(&self, name: &str) -> CoreResult<usize> {
            self.calls.borrow_mut().push(format!("kill {name}"));
            if self.refuse_kill {
                return Err(CoreError::Process("access denied".to_string()));
            }
            let mut running = self.running.borrow_mut();
            let before = running.len();
            running.retain(|n| n != name);
            Ok(before - running.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeProcessTable;
    use super::*;
    use std::time::Instant;

    #[test]
    fn not_running_skips_kill() {
        let table = FakeProcessTable::default();
        let outcome = terminate(&table, "Cursor", Duration::ZERO);
        assert_eq!(outcome, Termination::NotRunning);
        assert_eq!(*table.calls.borrow(), vec!["query Cursor".to_string()]);
    }

    #[test]
    fn running_process_is_removed_from_table() {
        let table = FakeProcessTable::with_running(&["Cursor", "Cursor", "bash"]);
        let outcome = terminate(&table, "Cursor", Duration::ZERO);
        assert_eq!(outcome, Termination::Killed(2));
        assert!(!table.is_running("Cursor"));
        assert!(table.is_running("bash"));
    }

    #[test]
    fn refused_kill_is_reported_not_raised() {
        let table = FakeProcessTable {
            refuse_kill: true,
            ..FakeProcessTable::with_running(&["Cursor"])
        };
        match terminate(&table, "Cursor", Duration::ZERO) {
            Termination::KillFailed(reason) => assert!(reason.contains("access denied")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    const SETTLE: Duration = Duration::from_millis(50);

    #[test]
    fn settles_after_successful_kill() {
        let table = FakeProcessTable::with_running(&["Cursor"]);
        let started = Instant::now();
        assert_eq!(terminate(&table, "Cursor", SETTLE), Termination::Killed(1));
        assert!(started.elapsed() >= SETTLE);
    }

    #[test]
    fn settles_after_refused_kill() {
        let table = FakeProcessTable {
            refuse_kill: true,
            ..FakeProcessTable::with_running(&["Cursor"])
        };
        let started = Instant::now();
        assert!(matches!(
            terminate(&table, "Cursor", SETTLE),
            Termination::KillFailed(_)
        ));
        assert!(started.elapsed() >= SETTLE);
    }

    #[test]
    fn no_settle_when_not_running() {
        let table = FakeProcessTable::default();
        let started = Instant::now();
        assert_eq!(
            terminate(&table, "Cursor", Duration::from_secs(5)),
            Termination::NotRunning
        );
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn name_match_is_exact() {
        let table = FakeProcessTable::with_running(&["Cursor Helper"]);
        assert_eq!(terminate(&table, "Cursor", Duration::ZERO), Termination::NotRunning);
    }

    #[test]
    fn system_table_does_not_find_unknown_name() {
        let table = ProcessManager::new();
        assert!(!table.is_running("cursorclean-no-such-process-7f3a"));
        assert_eq!(table.kill_all("cursorclean-no-such-process-7f3a").unwrap(), 0);
    }
}
