//! Viewer configuration.
//!
//! Deserialized from an optional JSON file; every field has a default so a
//! partial file (or none at all) is fine.

use crate::driver::Key;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming a config file for the viewer.
pub const CONFIG_ENV_VAR: &str = "TILED_VIEWER_CONFIG";

/// Top-level viewer settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    /// Window setup.
    pub window: WindowConfig,
    /// Redraw and cancel settings.
    pub frame: FrameConfig,
    /// Drawing settings.
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
#[allow(missing_docs)]
pub struct WindowConfig {
    pub title: String,
    pub width: i32,
    pub height: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Tiled map viewer".to_owned(),
            width: 800,
            height: 600,
        }
    }
}

/// Frame loop settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FrameConfig {
    /// Redraw tick period.
    pub tick_interval_ms: u64,
    /// Key that stops the viewer, in addition to closing the window.
    pub cancel_key: Key,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 30,
            cancel_key: Key::Escape,
        }
    }
}

/// Backend drawing settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Stroke width for object outlines, in pixels.
    pub line_thickness: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            line_thickness: 1.0,
        }
    }
}

impl ViewerConfig {
    /// Parses and validates a config document.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let config: ViewerConfig = serde_json::from_str(json).context("Parsing viewer config")?;
        if config.frame.tick_interval_ms == 0 {
            anyhow::bail!("frame.tick_interval_ms must be greater than zero");
        }
        Ok(config)
    }

    /// Reads and parses the config file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let txt = std::fs::read_to_string(path)
            .with_context(|| format!("Reading config file {}", path.display()))?;
        Self::from_json_str(&txt).with_context(|| format!("Loading config file {}", path.display()))
    }

    /// Loads the file named by [`CONFIG_ENV_VAR`], or defaults when unset.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }
}
