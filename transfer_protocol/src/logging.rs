//! Tracing setup for the command line tools.

use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber.
///
/// `RUST_LOG` takes precedence. Otherwise `verbosity` picks the level for
/// the transfer crates: 0 = info, 1 = debug, 2 or more = trace.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "transfer_protocol={},file_sender={},filesender={},file_receiver={},filereceiver={}",
            level, level, level, level, level
        ))
    });

    // Ignore a subscriber installed earlier, e.g. by a test harness.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity > 0)
        .try_init();
}
