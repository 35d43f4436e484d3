//! # Configuration Persistence
//!
//! Manages user configuration stored in `~/.config/termfolio/config.json`.
//!
//! ## Overview
//!
//! The [`Config`] struct is serialized to / deserialized from a JSON file in
//! the user's XDG config directory. It selects the theme and supplies the
//! friend list and interaction timings the page controller is built with.
//!
//! ## File Location
//!
//! ```text
//! ~/.config/termfolio/config.json
//! ```
//!
//! The `directories` crate is used to resolve the platform-appropriate config
//! directory.
//!
//! ## Example
//!
//! ```json
//! {
//!   "theme": "Nord",
//!   "friends": [
//!     { "name": "Ada", "handle": "ada", "quote": "hello", "url": "https://example.com" }
//!   ],
//!   "fade_delay_ms": 200
//! }
//! ```

use crate::controller::{
    default_friend, ControllerSettings, FriendEntry, DEFAULT_COLLAPSE_DELAY, DEFAULT_FADE_DELAY,
    DEFAULT_MOBILE_BREAKPOINT_PX,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Persisted user configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The name of the selected theme (must match a built-in theme name).
    #[serde(default = "default_theme_name")]
    pub theme: String,

    /// Entries shown by the friend links corner, in rotation order.
    #[serde(default = "default_friends")]
    pub friends: Vec<FriendEntry>,

    /// Viewport widths at or below this use the mobile menu.
    #[serde(default = "default_breakpoint")]
    pub mobile_breakpoint_px: u32,

    /// Quiet period after the pointer leaves the friend links before they collapse.
    #[serde(default = "default_collapse_delay_ms")]
    pub collapse_delay_ms: u64,

    /// How long the friend panel stays dimmed before its content is swapped.
    #[serde(default = "default_fade_delay_ms")]
    pub fade_delay_ms: u64,
}

fn default_theme_name() -> String {
    "Catppuccin Mocha".to_string()
}

fn default_friends() -> Vec<FriendEntry> {
    vec![default_friend()]
}

fn default_breakpoint() -> u32 {
    DEFAULT_MOBILE_BREAKPOINT_PX
}

fn default_collapse_delay_ms() -> u64 {
    DEFAULT_COLLAPSE_DELAY.as_millis() as u64
}

fn default_fade_delay_ms() -> u64 {
    DEFAULT_FADE_DELAY.as_millis() as u64
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme_name(),
            friends: default_friends(),
            mobile_breakpoint_px: default_breakpoint(),
            collapse_delay_ms: default_collapse_delay_ms(),
            fade_delay_ms: default_fade_delay_ms(),
        }
    }
}

impl Config {
    /// Load configuration from disk. Returns `Config::default()` if the file
    /// does not exist or cannot be parsed.
    pub fn load() -> Self {
        Self::try_load().unwrap_or_default()
    }

    /// Try to load configuration, returning an error on failure.
    fn try_load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path. Returns `Config::default()` if
    /// the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save the current configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Settings for the page controller.
    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            friends: self.friends.clone(),
            mobile_breakpoint_px: self.mobile_breakpoint_px,
            collapse_delay: Duration::from_millis(self.collapse_delay_ms),
            fade_delay: Duration::from_millis(self.fade_delay_ms),
        }
    }

    /// Return the path to the config file.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "termfolio")
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.json"))
    }
}
