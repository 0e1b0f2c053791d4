//! Tracing subscriber setup for the binary

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive string
pub const LOG_ENV: &str = "SITESTAGER_LOG";

/// Install the global subscriber writing to stderr.
///
/// `SITESTAGER_LOG` wins when set; otherwise `info`, or `debug` with `verbose`.
/// For a background job stderr is the job log, so tracing lines land there too.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
