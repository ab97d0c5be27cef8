//! TOML-based shell configuration.
//!
//! Stores host-side knobs that are not user-facing settings:
//! - Timer cadences (tick, flash, debounce)
//! - Default display and preview surface sizes for headless runs
//! - Text measurement (font file or average advance ratio)
//!
//! Configuration is stored at `<data dir>/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{data_dir, CONFIG_FILE};
use crate::error::{Result, SettingsError};
use crate::scheduler::Cadence;
use crate::sizing::{SurfaceSize, DEFAULT_ADVANCE_RATIO};

/// Cadence configuration, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CadenceConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_flash_ms")]
    pub flash_ms: u64,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

/// Surface dimensions used when no real window reports its size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_display_width")]
    pub width: f32,
    #[serde(default = "default_display_height")]
    pub height: f32,
    /// Preview panes as `[width, height]` pairs.
    #[serde(default = "default_previews")]
    pub previews: Vec<[f32; 2]>,
}

/// Text measurement configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureConfig {
    /// TrueType file to measure with. Falls back to system fonts, then to
    /// the advance ratio.
    #[serde(default)]
    pub font_path: Option<PathBuf>,
    #[serde(default = "default_advance_ratio")]
    pub advance_ratio: f32,
}

/// Shell configuration.
///
/// Serialized to/from TOML at `<data dir>/config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShellConfig {
    #[serde(default)]
    pub cadence: CadenceConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub measure: MeasureConfig,
}

// Default functions
fn default_tick_ms() -> u64 {
    1000
}
fn default_flash_ms() -> u64 {
    500
}
fn default_debounce_ms() -> u64 {
    100
}
fn default_display_width() -> f32 {
    1920.0
}
fn default_display_height() -> f32 {
    1080.0
}
fn default_previews() -> Vec<[f32; 2]> {
    vec![[480.0, 270.0], [480.0, 270.0]]
}
fn default_advance_ratio() -> f32 {
    DEFAULT_ADVANCE_RATIO
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            flash_ms: default_flash_ms(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_display_width(),
            height: default_display_height(),
            previews: default_previews(),
        }
    }
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            advance_ratio: default_advance_ratio(),
        }
    }
}

impl CadenceConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    pub fn flash(&self) -> Duration {
        Duration::from_millis(self.flash_ms.max(1))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn cadence(&self) -> Cadence {
        Cadence {
            tick: self.tick(),
            flash: self.flash(),
            debounce: self.debounce(),
        }
    }
}

impl DisplayConfig {
    pub fn primary(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }

    pub fn preview_sizes(&self) -> impl Iterator<Item = SurfaceSize> + '_ {
        self.previews.iter().map(|[w, h]| SurfaceSize::new(*w, *h))
    }
}

impl ShellConfig {
    /// Location of `config.toml` in the data directory.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join(CONFIG_FILE))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| SettingsError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        match current {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => Some(String::new()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, in memory only.
    ///
    /// The value is parsed as a TOML value, falling back to a plain string.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut root = toml::Value::try_from(&*self).map_err(|e| SettingsError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        let parsed = format!("v = {value}")
            .parse::<toml::Table>()
            .ok()
            .and_then(|mut t| t.remove("v"))
            .unwrap_or_else(|| toml::Value::String(value.to_string()));

        let mut parts = key.split('.').peekable();
        let mut current = &mut root;
        while let Some(part) = parts.next() {
            let table = current
                .as_table_mut()
                .ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;
            if parts.peek().is_none() {
                // Optional keys are omitted from the table when unset.
                if !table.contains_key(part) && key != "measure.font_path" {
                    return Err(SettingsError::UnknownKey(key.to_string()).into());
                }
                table.insert(part.to_string(), parsed);
                break;
            }
            current = table
                .get_mut(part)
                .ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;
        }

        *self = root.try_into().map_err(|e: toml::de::Error| SettingsError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}
