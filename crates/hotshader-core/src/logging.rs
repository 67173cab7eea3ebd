//! Log subscriber setup for applications embedding hot-reloadable shaders.
//!
//! The library itself only emits `tracing` events. Call [`init`] once at
//! startup (or install your own subscriber) to see them.

use anyhow::{anyhow, Result};
use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static LOGGING: OnceCell<()> = OnceCell::new();

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Install a formatted stderr subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once; only the first call installs anything.
pub fn init() -> Result<()> {
    LOGGING
        .get_or_try_init(|| {
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
        })
        .map(|_| ())
}
