use anyhow::Result;
use clap::Parser;
use std::process;
use std::thread;
use tracebait::{
    options::ProbeOptions,
    probe::{self, TrapVerdict},
};

fn main() -> Result<()> {
    let options = ProbeOptions::parse();
    tracebait::init_logging();

    if let TrapVerdict::Intercepted = probe::detect_debugger()? {
        // the one line this program is allowed to print
        println!("There is a debugger attached!");
        process::exit(probe::DETECTION_EXIT_CODE);
    }

    thread::sleep(options.linger());
    Ok(())
}
