//! Fast path for handles that have begun closing

use super::handle::RuntimeEnv;
use super::metrics::dispatch_metrics;
use std::fmt;
use std::io::{self, Write};

/// Tag written in front of the literal message when a handle is closed
pub const CLOSED_DIAGNOSTIC_TAG: &str = "log failed due to closed handle";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The caller may read the handle and dispatch
    Open,
    /// The diagnostic has been written; the caller must return
    Closed,
}

/// Stops a log call before it reads any state of a closing handle.
///
/// Only `RuntimeEnv::is_closed` is consulted. On a closed handle the message
/// goes, unprefixed, to standard error in a single write and nothing else
/// happens. Standard error is unbuffered, so the line is not lost if the
/// process is torn down right after.
pub struct ClosedStateGuard;

impl ClosedStateGuard {
    pub fn check<E, M>(env: &E, message: M) -> GuardOutcome
    where
        E: RuntimeEnv + ?Sized,
        M: fmt::Display,
    {
        Self::check_with(env, message, &mut io::stderr())
    }

    /// Same as [`check`](Self::check) with an explicit diagnostic channel
    pub fn check_with<E, M, W>(env: &E, message: M, out: &mut W) -> GuardOutcome
    where
        E: RuntimeEnv + ?Sized,
        M: fmt::Display,
        W: Write + ?Sized,
    {
        if !env.is_closed() {
            return GuardOutcome::Open;
        }

        dispatch_metrics().record_closed_rejection();
        let line = format!("{}: {}\n", CLOSED_DIAGNOSTIC_TAG, message);
        // Nowhere left to report a failed diagnostic write.
        let _ = out.write_all(line.as_bytes());
        GuardOutcome::Closed
    }
}
