//! Per-shader reload settings.

use std::time::Duration;

use tracing::warn;

/// Accumulated frame time between two file checks in [`Shader::hot_reload`].
///
/// [`Shader::hot_reload`]: crate::Shader::hot_reload
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Env var that turns bind-time reload checks on (`1`/`true`) or off.
pub const HOT_RELOAD_ENV: &str = "HOTSHADER_HOT_RELOAD";

/// Env var overriding the poll interval, in milliseconds.
pub const POLL_MS_ENV: &str = "HOTSHADER_POLL_MS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderConfig {
    /// Check the backing file for changes on every `bind()`.
    ///
    /// Does not gate `Shader::hot_reload(elapsed)`, which polls file-backed
    /// shaders regardless.
    pub hot_reload: bool,
    /// Threshold for the time accumulator in `hot_reload(elapsed)`.
    pub poll_interval: Duration,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            hot_reload: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ShaderConfig {
    pub fn with_hot_reload(mut self, hot_reload: bool) -> Self {
        self.hot_reload = hot_reload;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Defaults overridden by [`HOT_RELOAD_ENV`] and [`POLL_MS_ENV`].
    ///
    /// Values that do not parse are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(value) = lookup(HOT_RELOAD_ENV) {
            match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "on" | "yes" => config.hot_reload = true,
                "0" | "false" | "off" | "no" => config.hot_reload = false,
                other => warn!("ignoring {HOT_RELOAD_ENV}={other:?}"),
            }
        }

        if let Some(value) = lookup(POLL_MS_ENV) {
            match value.trim().parse::<u64>() {
                Ok(ms) => config.poll_interval = Duration::from_millis(ms),
                Err(e) => warn!("ignoring {POLL_MS_ENV}={value:?}: {e}"),
            }
        }

        config
    }
}
