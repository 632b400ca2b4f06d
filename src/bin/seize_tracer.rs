use anyhow::Result;
use clap::Parser;
use std::thread;
use tracebait::{options::SeizeOptions, tracer};
use tracing::{debug, trace};

fn main() -> Result<()> {
    let options = SeizeOptions::parse();
    tracebait::init_logging();

    // fire and forget: the pair reports nothing back and nobody here
    // waits on it
    match tracer::spawn_mutual_tracers(options.settle()) {
        Ok(pair) => trace!("descendant pair forked, middle process {}", pair),
        Err(err) => debug!("could not fork descendant pair: {:?}", err),
    }

    thread::sleep(options.stagger());
    tracer::traceme_and_hold(options.settle());
    Ok(())
}
