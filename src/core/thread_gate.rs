//! Thread ownership check in front of every handle read

use super::handle::{RuntimeEnv, ThreadCheck};
use std::io::{self, Write};
use std::panic::Location;
use std::process;
use std::thread;

/// Asserts that the calling thread owns the handle.
///
/// A violation writes one `[ENV LOG FATAL]` line to stderr and aborts the
/// process. It does not unwind, so no caller can catch it and go on reading
/// racily mutated handle state.
pub struct ThreadIntegrityGate;

impl ThreadIntegrityGate {
    #[track_caller]
    #[inline]
    pub fn enforce<E: RuntimeEnv + ?Sized>(env: &E, check: ThreadCheck) {
        if check.is_enforced() && !env.current_thread_matches() {
            Self::violation();
        }
    }

    /// Non-fatal form of [`enforce`](Self::enforce)
    #[inline]
    pub fn permits<E: RuntimeEnv + ?Sized>(env: &E, check: ThreadCheck) -> bool {
        !check.is_enforced() || env.current_thread_matches()
    }

    #[cold]
    #[inline(never)]
    #[track_caller]
    fn violation() -> ! {
        let current = thread::current();
        let line = format!(
            "[ENV LOG FATAL] thread {:?} ({}) is not its owning thread, at {}\n",
            current.id(),
            current.name().unwrap_or("<unnamed>"),
            Location::caller()
        );
        // Aborting regardless; a failed write has nowhere to go.
        let _ = io::stderr().write_all(line.as_bytes());
        process::abort()
    }
}

/// Runs `body` in a fresh copy of the test binary and asserts that it aborted
/// with the fatal ownership line.
///
/// `test_path` is `concat!(module_path!(), "::<test fn>")` of the calling test.
#[cfg(test)]
pub(crate) fn assert_fatal_in_child(test_path: &str, body: impl FnOnce()) {
    use std::process::Command;

    const CHILD_ENV: &str = "ENV_LOG_FATAL_CHILD";

    let test_name = test_path.split_once("::").map_or(test_path, |(_, rest)| rest);
    if std::env::var(CHILD_ENV).as_deref() == Ok(test_name) {
        body();
        return;
    }

    let output = Command::new(std::env::current_exe().expect("test binary path"))
        .args([test_name, "--exact", "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, test_name)
        .output()
        .expect("spawn test binary");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success(), "child survived: {}", stderr);
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        assert_eq!(output.status.signal(), Some(6), "expected SIGABRT: {}", stderr);
    }
    assert!(stderr.contains("[ENV LOG FATAL]"), "missing fatal line: {}", stderr);
    assert!(stderr.contains("not its owning thread"));
}
