//! Logging initialisation
//!
//! Installs the process-wide `tracing` subscriber. Library code only emits
//! events; whoever embeds the recommender decides whether to call this.

use crate::config::ObservabilityConfig;
use crate::errors::{GraphError, Result};
use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber configured from `ObservabilityConfig`.
///
/// `RUST_LOG` takes precedence over the configured level. Fails if a global
/// subscriber is already installed.
pub fn init_tracing(config: &ObservabilityConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|e| {
            GraphError::Other(anyhow::anyhow!(
                "Invalid log level {:?}: {}",
                config.log_level,
                e
            ))
        })?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json_logging {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };

    installed.map_err(|e| {
        GraphError::Other(anyhow::anyhow!("Failed to install subscriber: {}", e))
    })?;

    tracing::info!(service = %config.service_name, "Tracing initialised");
    Ok(())
}
