#![cfg(target_os = "linux")]


use std::process::Command;

use anyhow::Result;
use nix::sys::signal::{self, Signal};
use tracebait::probe::{self, TrapVerdict};

// the trap counter is global to this test process and the harness runs
// tests on parallel threads, so in-process assertions are deltas from
// a snapshot rather than absolute counts

/// A raised SIGTRAP must land in the counting handler.
#[test]
fn handler_counts_raised_sigtrap() {
    probe::install_trap_handler().expect("handler should install");
    let before = probe::trap_hits();
    signal::raise(Signal::SIGTRAP).expect("raise should succeed");
    assert!(probe::trap_hits() > before);
}

/// The breakpoint instruction's trap must come back to this process
/// when nothing traces it.
#[test]
fn breakpoint_reaches_handler_untraced() {
    probe::install_trap_handler().expect("handler should install");
    let before = probe::trap_hits();
    probe::breakpoint();
    assert!(probe::trap_hits() > before);
}

/// The full probe sequence should see its own trap here, since the
/// test harness is not a tracer.
#[test]
fn untraced_probe_reports_handler_ran() {
    let verdict = probe::detect_debugger().expect("probe should run");
    assert_eq!(verdict, TrapVerdict::HandlerRan);
}

/// The real binary, run untraced: no stdout and a zero exit, and the
/// same again on a rerun from a clean process.
#[test]
fn untraced_run_is_silent() -> Result<()> {
    for _ in 0..2 {
        let output = Command::new(fixtures::trap_probe_bin())
            .args(["--linger-secs", "0"])
            .output()?;
        assert!(output.status.success(), "probe exited {:?}", output.status);
        assert!(
            output.stdout.is_empty(),
            "unexpected stdout: {:?}",
            String::from_utf8_lossy(&output.stdout)
        );
    }
    Ok(())
}
