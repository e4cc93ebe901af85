use std::io;

use tracing_subscriber::EnvFilter;

/// Installs the process-wide fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise verbosity maps to a default filter:
/// quiet ⇒ `error`, default ⇒ `info`, `-v` ⇒ `debug`, `-vv` ⇒ `trace`.
/// Diagnostics go to stderr so piped output stays clean.
pub fn init(verbosity: u8, quiet: bool) {
    let default_filter = if quiet {
        "error"
    } else {
        match verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
