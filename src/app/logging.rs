// SPDX-License-Identifier: MPL-2.0
//! Tracing subscriber setup for the binary.

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Environment variable holding the log filter; `RUST_LOG` is the fallback.
pub const ENV_LOG: &str = "RACE_ANA_LOG";

fn default_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("race_ana=debug")
    } else {
        EnvFilter::new("warn")
    }
}

/// Installs the global subscriber. Logs go to stderr so command output on
/// stdout stays clean. Calling it twice only reports the second failure.
pub fn init_logging(verbose: bool) {
    let filter = std::env::var(ENV_LOG)
        .or_else(|_| std::env::var("RUST_LOG"))
        .map_or_else(
            |_| default_filter(verbose),
            |value| EnvFilter::try_new(value).unwrap_or_else(|_| default_filter(verbose)),
        );

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_is_idempotent() {
        init_logging(false);
        init_logging(true);
    }
}
