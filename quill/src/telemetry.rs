//! Tracing setup.
//!
//! Logs go to stdout through the `fmt` layer. The level comes from `RUST_LOG` and defaults to
//! `info`, e.g. `RUST_LOG=quill=debug,tower_http=info`.

use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    info!("Telemetry initialized");
    Ok(())
}
