// Logging module for structured logging using the tracing crate

use std::error::Error;
use tracing_subscriber::EnvFilter;

/// Default filter applied when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize a human-readable tracing subscriber
///
/// The library itself only emits `tracing` events; applications that want to
/// see them call this once at startup. Level filtering honours `RUST_LOG`
/// and falls back to `info`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
///
/// # Examples
///
/// ```
/// use intervention_image::logging::init_subscriber;
///
/// let _ = init_subscriber();
/// tracing::info!("Application started");
/// ```
pub fn init_subscriber() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .try_init()
}

/// Initialize a JSON tracing subscriber for log aggregation pipelines
pub fn init_json_subscriber() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter())
        .with_current_span(false)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_reports_error() {
        // Whichever call wins installs the global subscriber; the other must
        // fail instead of panicking.
        let first = init_subscriber();
        let second = init_json_subscriber();
        assert!(first.is_err() || second.is_err());
    }
}
