//! Diagnostic logging setup. Output goes to stderr so command output on
//! stdout stays clean.

use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins; otherwise `level` (from config), or `debug` with `--verbose`.
pub fn init_logging(level: &str, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level))
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // a second init (e.g. from tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
