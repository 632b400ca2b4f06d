use clap::Parser;
use std::time::Duration;

/// Command line surface for the `trap-probe` fixture.
///
/// The defaults reproduce the fixture's canonical timing; the flags
/// exist so a harness can tighten the schedule, not to change
/// behavior.
#[derive(Clone, Debug, Parser)]
#[command(version, about = "SIGTRAP self-detection probe")]
pub struct ProbeOptions {
    // Seconds to stay alive after a clean probe, so an external
    // observer has a window to look at us.
    #[arg(long = "linger-secs", default_value_t = 1)]
    pub linger_secs: u64,
}

impl ProbeOptions {
    pub fn linger(&self) -> Duration {
        Duration::from_secs(self.linger_secs)
    }
}

/// Command line surface for the `seize-tracer` fixture.
#[derive(Clone, Debug, Parser)]
#[command(version, about = "fork pair that seize-traces itself")]
pub struct SeizeOptions {
    // Seconds each descendant keeps its trace relationship alive
    // before exiting. Also how long the root holds its self-trace.
    #[arg(long = "settle-secs", default_value_t = 3)]
    pub settle_secs: u64,
    // Seconds the root waits after spawning the descendants before
    // issuing its own self-trace request.
    #[arg(long = "stagger-secs", default_value_t = 1)]
    pub stagger_secs: u64,
}

impl SeizeOptions {
    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }

    pub fn stagger(&self) -> Duration {
        Duration::from_secs(self.stagger_secs)
    }
}
