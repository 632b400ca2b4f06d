//! Mutual seize tracing across a double fork.
//!
//! One fork produces a middle process, a second fork a grandchild.
//! The middle process seize-traces the grandchild it just created; the
//! grandchild seize-traces whatever `getppid` reports at that instant.
//! Both linger for a settle window and exit, leaving the caller free
//! to claim its own tracer slot with `PTRACE_TRACEME` afterwards.
//!
//! None of the ptrace requests have to succeed. A fixture like this
//! exists to occupy tracer slots and generate attach traffic, not to
//! control the processes it touches, so failures are logged at debug
//! level and dropped.

use anyhow::Result;
use nix::sys::ptrace;
use nix::unistd::{ForkResult, Pid, fork, getppid};
use std::process;
use std::thread;
use std::time::Duration;
use tracing::{debug, trace};

/// Exit code both descendants report once their settle window ends.
pub const DESCENDANT_EXIT_CODE: i32 = 1;

/// Fork the descendant pair and return without waiting on it.
///
/// Returns in the calling process only, carrying the middle process's
/// pid. The descendants never return: each issues one seize attempt,
/// sleeps for `settle`, and leaves via [`process::exit`] with
/// [`DESCENDANT_EXIT_CODE`]. The pair is deliberately unattended, so
/// the middle process turns into a zombie of the caller and the
/// grandchild gets reparented when the middle exits. Callers that need
/// to observe the grandchild must register as a child subreaper before
/// calling this.
pub fn spawn_mutual_tracers(settle: Duration) -> Result<Pid> {
    match unsafe { fork()? } {
        ForkResult::Parent { child } => Ok(child),
        ForkResult::Child => run_descendants(settle),
    }
}

// Middle-process side of the pair. Forks the grandchild, points each
// side at its trace target, and never comes back.
fn run_descendants(settle: Duration) -> ! {
    let target = match unsafe { fork() } {
        // middle process aims at the grandchild it just created
        Ok(ForkResult::Parent { child }) => Some(child),
        // grandchild aims at whoever its parent is right now
        Ok(ForkResult::Child) => Some(resolve_trace_target()),
        Err(errno) => {
            debug!("second fork failed ({}), nothing to trace", errno);
            None
        }
    };
    if let Some(target) = target {
        attempt_seize(target);
    }
    thread::sleep(settle);
    process::exit(DESCENDANT_EXIT_CODE);
}

/// The grandchild's trace target: its parent at the moment of the call.
///
/// This read races with the middle process's exit. Lose the race and
/// `getppid` reports the adoptive parent instead, meaning the nearest
/// child subreaper above us or pid 1. Both answers are live processes
/// and the seize attempt goes ahead either way; which one gets aimed
/// at is timing, not an error.
pub fn resolve_trace_target() -> Pid {
    getppid()
}

/// Fire one `PTRACE_SEIZE` at `target` and ignore the outcome.
///
/// Seizing reserves the target's tracer slot without stopping it.
/// Refusals are routine here: the slot may be taken already, or the
/// target may be out of reach under a restrictive Yama `ptrace_scope`.
pub fn attempt_seize(target: Pid) {
    match ptrace::seize(target, ptrace::Options::empty()) {
        Ok(()) => trace!("seized {}", target),
        Err(errno) => debug!("seize of {} failed: {}", target, errno),
    }
}

/// Ask to be traced by our parent, then hold still.
///
/// `PTRACE_TRACEME` is refused when an outside tracer already holds
/// our slot, which is precisely the condition this fixture exists to
/// surface, so the refusal is logged and swallowed rather than treated
/// as an error. The hold keeps the pid alive long enough for an
/// observer to inspect the aftermath.
pub fn traceme_and_hold(hold: Duration) {
    match ptrace::traceme() {
        Ok(()) => trace!("traceme accepted, parent now traces us"),
        Err(errno) => debug!("traceme refused: {}", errno),
    }
    thread::sleep(hold);
}
