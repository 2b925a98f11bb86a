use std::sync::atomic::{AtomicBool, Ordering};
use tracing::Level;

static QUIET_MODE: AtomicBool = AtomicBool::new(false);

pub fn is_quiet() -> bool {
    QUIET_MODE.load(Ordering::Relaxed)
}

/// Picks the maximum tracing level for the given flags. Quiet wins over verbose.
pub fn level_for(quiet: bool, verbose: bool) -> Level {
    if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

/// Installs the global subscriber. Safe to call more than once; later calls
/// only update the quiet flag.
pub fn init(quiet: bool, verbose: bool) {
    QUIET_MODE.store(quiet, Ordering::Relaxed);

    let _ = tracing_subscriber::fmt()
        .with_max_level(level_for(quiet, verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
