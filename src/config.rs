//! Sheet configuration.
//!
//! Resource caps, timing and the storage key are configuration rather than
//! fixed rules. Every field has a default; `from_env` overrides them from
//! `DIESHEET_*` environment variables.

use crate::resolver::DEFAULT_ROLL_DELAY;
use crate::resources::{DEFAULT_AETHER_MAX, DEFAULT_MONOLOG_MAX};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default local document key.
pub const DEFAULT_STORAGE_KEY: &str = "megaMechaState";

/// Default delay between a local write and the remote push.
pub const DEFAULT_SYNC_DEBOUNCE: Duration = Duration::from_secs(10);

/// Configuration for a character sheet and its session.
///
/// # Examples
///
/// ```rust
/// use diesheet::SheetConfig;
///
/// let config: SheetConfig = serde_json::from_str(r#"{ "monolog_max": 5 }"#).unwrap();
/// assert_eq!(config.monolog_max, 5);
/// assert_eq!(config.aether_max, 200);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Aether token cap.
    pub aether_max: u32,
    /// Monolog-o-meter capacity.
    pub monolog_max: u32,
    /// Pause between a roll's continuation announcement and its next draw.
    pub roll_delay_ms: u64,
    /// Debounce between a local save and the remote push.
    pub sync_debounce_ms: u64,
    /// Key of the document in the local store.
    pub storage_key: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            aether_max: DEFAULT_AETHER_MAX,
            monolog_max: DEFAULT_MONOLOG_MAX,
            roll_delay_ms: DEFAULT_ROLL_DELAY.as_millis() as u64,
            sync_debounce_ms: DEFAULT_SYNC_DEBOUNCE.as_millis() as u64,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Read an environment variable, falling back when missing or unparseable.
fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl SheetConfig {
    /// Load configuration from the environment.
    ///
    /// - `DIESHEET_AETHER_MAX` (default 200)
    /// - `DIESHEET_MONOLOG_MAX` (default 6)
    /// - `DIESHEET_ROLL_DELAY_MS` (default 600)
    /// - `DIESHEET_SYNC_DEBOUNCE_MS` (default 10000)
    /// - `DIESHEET_STORAGE_KEY` (default `megaMechaState`)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            aether_max: env_or("DIESHEET_AETHER_MAX", defaults.aether_max),
            monolog_max: env_or("DIESHEET_MONOLOG_MAX", defaults.monolog_max),
            roll_delay_ms: env_or("DIESHEET_ROLL_DELAY_MS", defaults.roll_delay_ms),
            sync_debounce_ms: env_or("DIESHEET_SYNC_DEBOUNCE_MS", defaults.sync_debounce_ms),
            storage_key: env_or("DIESHEET_STORAGE_KEY", defaults.storage_key),
        }
    }

    pub fn roll_delay(&self) -> Duration {
        Duration::from_millis(self.roll_delay_ms)
    }

    pub fn sync_debounce(&self) -> Duration {
        Duration::from_millis(self.sync_debounce_ms)
    }
}
