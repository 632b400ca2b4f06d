//! SIGTRAP self-delivery probe.
//!
//! The classic check: install a handler, then execute the
//! architecture's breakpoint instruction and see whether the trap
//! comes back to us. An untraced process receives its own SIGTRAP.
//! Under ptrace the trap is reported to the tracer instead, and unless
//! the tracer forwards the signal on resume the handler never runs.

use anyhow::Result;
use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};
use std::arch::asm;
use std::sync::atomic::{AtomicU32, Ordering};

/// Process exit code when a probe concludes a tracer is attached.
pub const DETECTION_EXIT_CODE: i32 = 1;

// The handler gets no closure state, so the count lives in a static.
// Release on the handler's bump, Acquire on the read, so a count
// published inside the handler is visible once control returns here.
static TRAP_HITS: AtomicU32 = AtomicU32::new(0);

#[cfg(target_arch = "x86_64")]
extern "C" fn note_trap(_signal: libc::c_int) {
    // nothing but the atomic bump; anything else isn't signal-safe.
    TRAP_HITS.fetch_add(1, Ordering::Release);
}

// aarch64 delivers a breakpoint trap with the pc still on the brk
// instruction, so the handler must step over it or sigreturn lands on
// the same brk again. Only breakpoint traps carry TRAP_BRKPT; a raised
// SIGTRAP must leave the pc alone.
#[cfg(target_arch = "aarch64")]
extern "C" fn note_trap(
    _signal: libc::c_int,
    info: *mut libc::siginfo_t,
    context: *mut libc::c_void,
) {
    let ucontext = context as *mut libc::ucontext_t;
    // SAFETY: the kernel hands the handler a valid siginfo and ucontext.
    unsafe {
        if !info.is_null() && !ucontext.is_null() && (*info).si_code == libc::TRAP_BRKPT {
            (*ucontext).uc_mcontext.pc += 4;
        }
    }
    TRAP_HITS.fetch_add(1, Ordering::Release);
}

/// Outcome of a single breakpoint probe.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TrapVerdict {
    /// The trap reached our own handler; nobody intercepted it.
    HandlerRan,
    /// The trap never came back, so something upstream consumed it.
    Intercepted,
}

/// Install the counting SIGTRAP handler for the whole process.
///
/// x86_64 gets the plain single-argument form, no flags: the trap
/// already points past the `int3` and the handler only bumps the
/// counter. aarch64 needs the siginfo form so the handler can move the
/// pc off the `brk`.
pub fn install_trap_handler() -> Result<()> {
    #[cfg(target_arch = "x86_64")]
    let handler = SigHandler::Handler(note_trap);
    #[cfg(target_arch = "aarch64")]
    let handler = SigHandler::SigAction(note_trap);

    let action = SigAction::new(handler, SaFlags::empty(), SigSet::empty());
    // SAFETY: note_trap only touches the atomic and the interrupted
    // context the kernel handed it.
    unsafe { signal::sigaction(Signal::SIGTRAP, &action)? };
    Ok(())
}

/// Execute one software breakpoint instruction.
///
/// The handler from [`install_trap_handler`] must already be in place;
/// with the default disposition the trap kills the process instead.
#[inline(always)]
pub fn breakpoint() {
    // SAFETY: the trap instruction touches no registers or memory the
    // compiler cares about, it only raises SIGTRAP.
    #[cfg(target_arch = "x86_64")]
    unsafe {
        asm!("int3");
    }
    #[cfg(target_arch = "aarch64")]
    unsafe {
        asm!("brk #0");
    }
}

/// Number of traps the handler has observed so far in this process.
pub fn trap_hits() -> u32 {
    TRAP_HITS.load(Ordering::Acquire)
}

/// Run the full probe once: arm the handler, trip a breakpoint, and
/// report whether the trap made it back to this process.
pub fn detect_debugger() -> Result<TrapVerdict> {
    let before = trap_hits();
    install_trap_handler()?;
    breakpoint();
    if trap_hits() == before {
        Ok(TrapVerdict::Intercepted)
    } else {
        Ok(TrapVerdict::HandlerRan)
    }
}
