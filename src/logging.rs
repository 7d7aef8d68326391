//! Logging initialization utilities.

use env_logger::Env;

/// Initialize logging with a default filter level.
///
/// `RUST_LOG` always wins; `verbose` only changes the fallback.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env = Env::default().default_filter_or(default_level);
    let _ = env_logger::Builder::from_env(env).try_init();
}
