//! Logging setup.
//!
//! Composition logs go to stderr so that rendered topologies on stdout stay
//! machine-readable.

use crate::error::{QuizstackError, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence (e.g. `quizstack_core=debug`). Otherwise the
/// level is WARN, or DEBUG when `verbose` is set. Fails if a subscriber is
/// already installed.
pub fn init(verbose: bool) -> Result<()> {
    let default_level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(default_level.into()));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .with_level(true),
        )
        .try_init()
        .map_err(|e| QuizstackError::Internal(format!("Failed to initialize logging: {}", e)))?;

    tracing::debug!("Logging initialized");
    Ok(())
}
