//! Panel settings.
//!
//! Loaded from `<config_dir>/dockboard/settings.json`. Every field is
//! optional; a minimal `{}` file is valid and missing fields fall back to
//! the compiled-in defaults.
//!
//! # Example
//!
//! ```json
//! {
//!   "side": "left",
//!   "width": 480.0,
//!   "dwell_delay_ms": 400,
//!   "animation_ms": 200
//! }
//! ```
//!
//! All durations are in **milliseconds**. Set `animation_ms` to `0` for an
//! instant slide.

use crate::constants::{
    ACTIVATION_ZONE, ANIMATION_MS, DEFAULT_PANEL_WIDTH, DWELL_DELAY_MS, DWELL_JITTER,
    MAX_PANEL_WIDTH, MIN_PANEL_WIDTH, POLL_INTERVAL_MS, RESCAN_INTERVAL_MS, SAVE_DEBOUNCE_MS,
};
use crate::error::SettingsError;
use crate::panel::DockSide;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

pub const SETTINGS_FILE: &str = "settings.json";
pub const APP_DIR: &str = "dockboard";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSettings {
    /// Screen edge to dock to.
    pub side: DockSide,
    /// Panel width used when no width has been saved yet.
    pub width: f64,
    /// How long the cursor must rest at the edge before the panel slides in.
    pub dwell_delay_ms: u64,
    /// Cursor poll period.
    pub poll_interval_ms: u64,
    /// Monitor topology rescan period.
    pub rescan_interval_ms: u64,
    /// Slide animation duration.
    pub animation_ms: u64,
    /// Width of the edge strip that arms the dwell timer (px).
    pub activation_zone: f64,
    /// Cursor movement inside the zone that restarts the dwell timer (px).
    pub dwell_jitter: f64,
    /// Delay from the first tick that sees the layout dirty to the save.
    pub save_debounce_ms: u64,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            side: DockSide::Right,
            width: DEFAULT_PANEL_WIDTH,
            dwell_delay_ms: DWELL_DELAY_MS,
            poll_interval_ms: POLL_INTERVAL_MS,
            rescan_interval_ms: RESCAN_INTERVAL_MS,
            animation_ms: ANIMATION_MS,
            activation_zone: ACTIVATION_ZONE,
            dwell_jitter: DWELL_JITTER,
            save_debounce_ms: SAVE_DEBOUNCE_MS,
        }
    }
}

impl PanelSettings {
    /// Load settings from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let settings: Self =
            serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        Ok(settings.clamped())
    }

    /// Load settings, falling back to defaults when the file is missing or
    /// unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    /// Bring out-of-range values back into their valid range.
    pub fn clamped(mut self) -> Self {
        self.width = clamp_width(self.width);
        self.activation_zone = self.activation_zone.max(1.0);
        self.dwell_jitter = self.dwell_jitter.max(0.0);
        self.poll_interval_ms = self.poll_interval_ms.max(1);
        self.rescan_interval_ms = self.rescan_interval_ms.max(1);
        self
    }

    pub fn dwell_delay(&self) -> Duration {
        Duration::from_millis(self.dwell_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn rescan_interval(&self) -> Duration {
        Duration::from_millis(self.rescan_interval_ms)
    }

    pub fn animation(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }

    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }
}

/// Clamp a panel width into `[MIN_PANEL_WIDTH, MAX_PANEL_WIDTH]`. Non-finite
/// input becomes the default width.
pub fn clamp_width(width: f64) -> f64 {
    if !width.is_finite() {
        return DEFAULT_PANEL_WIDTH;
    }
    width.clamp(MIN_PANEL_WIDTH, MAX_PANEL_WIDTH)
}

/// `<config_dir>/dockboard`, if the platform has a config directory.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

pub fn default_settings_path() -> Option<PathBuf> {
    default_config_dir().map(|dir| dir.join(SETTINGS_FILE))
}
