//! Structured logging configuration.
//!
//! Logs go to stderr so JSON written to stdout stays machine readable.
//! Records from the engine's `log` calls are bridged into the subscriber.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with levels from `RUST_LOG` (default `info`)
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::debug!("Structured logging initialized");
}

/// Log a tournament transition with structured fields
pub fn log_transition(tournament_id: &str, phase: &str, round: u32, message: &str) {
    tracing::info!(
        tournament_id = tournament_id,
        phase = phase,
        round = round,
        "{}",
        message
    );
}
