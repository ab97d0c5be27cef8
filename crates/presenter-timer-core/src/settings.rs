//! The application settings snapshot.
//!
//! Stores user preferences including:
//! - Timer and message font families, size sliders and colours
//! - Background colour and image, plus the recent image list
//! - Alert thresholds
//! - Display window placement flags
//!
//! The countdown core only reads thresholds, size sliders, colours and font
//! families. Persistence lives in [`crate::storage::SettingsStore`].

use serde::{Deserialize, Deserializer, Serialize};

use crate::color::ColorName;
use crate::error::SettingsError;
use crate::sizing::MESSAGE_DEFAULT_VALUE;

/// Upper bound on remembered background images.
pub const MAX_RECENT_IMAGES: usize = 10;

pub const DEFAULT_MAX_IMAGE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

/// Insertion-ordered, de-duplicated, bounded list of image paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct RecentImages(Vec<String>);

impl RecentImages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `path` unless already present. The oldest entry is dropped
    /// once the list is full.
    pub fn push(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        if path.is_empty() || self.0.contains(&path) {
            return false;
        }
        self.0.push(path);
        if self.0.len() > MAX_RECENT_IMAGES {
            self.0.remove(0);
        }
        true
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for RecentImages {
    fn from(paths: Vec<String>) -> Self {
        let mut recent = Self::new();
        for path in paths {
            recent.push(path);
        }
        recent
    }
}

impl From<RecentImages> for Vec<String> {
    fn from(recent: RecentImages) -> Self {
        recent.0
    }
}

fn non_negative_threshold<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(raw.clamp(0, i64::from(u32::MAX)) as u32)
}

/// Application settings.
///
/// Serialized to/from JSON at `<data dir>/settings.json`. Missing fields
/// take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Timer size slider, 0-100.
    pub timer_font_size: f32,
    pub timer_color: ColorName,
    /// Message size slider, 20-100.
    pub message_font_size: f32,
    pub message_color: ColorName,
    pub background_color: ColorName,
    /// -1 selects the first secondary monitor.
    pub monitor_index: i32,
    pub is_topmost: bool,
    pub is_full_screen: bool,
    /// Empty when no image is selected.
    pub image_path: String,
    pub recent_images: RecentImages,
    /// Seconds remaining at which the timer turns yellow.
    #[serde(deserialize_with = "non_negative_threshold")]
    pub yellow_alert_threshold: u32,
    /// Seconds remaining at which the timer turns red.
    #[serde(deserialize_with = "non_negative_threshold")]
    pub red_alert_threshold: u32,
    pub max_image_size_bytes: u64,
    pub enable_animations: bool,
    pub timer_font: String,
    pub message_font: String,
    /// Colour restored when the background image is hidden.
    pub previous_background_color: ColorName,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            timer_font_size: 95.0,
            timer_color: ColorName::white(),
            message_font_size: MESSAGE_DEFAULT_VALUE,
            message_color: ColorName::white(),
            background_color: ColorName::black(),
            monitor_index: -1,
            is_topmost: false,
            is_full_screen: false,
            image_path: String::new(),
            recent_images: RecentImages::new(),
            yellow_alert_threshold: 300,
            red_alert_threshold: 60,
            max_image_size_bytes: DEFAULT_MAX_IMAGE_SIZE_BYTES,
            enable_animations: true,
            timer_font: "Arial".into(),
            message_font: "Arial".into(),
            previous_background_color: ColorName::black(),
        }
    }
}

impl AppSettings {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), SettingsError> {
        let unknown = || SettingsError::UnknownKey(key.to_string());
        let invalid = |message: String| SettingsError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Get a settings value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a settings value by key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// for the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| SettingsError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| SettingsError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Record an accepted background image.
    pub fn remember_image(&mut self, path: impl Into<String>) {
        let path = path.into();
        self.recent_images.push(path.clone());
        self.image_path = path;
    }

    /// True when the red threshold sits above the yellow one.
    pub fn thresholds_inverted(&self) -> bool {
        crate::alert::thresholds_inverted(self.yellow_alert_threshold, self.red_alert_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_values() {
        let s = AppSettings::default();
        assert_eq!(s.yellow_alert_threshold, 300);
        assert_eq!(s.red_alert_threshold, 60);
        assert_eq!(s.max_image_size_bytes, 5 * 1024 * 1024);
        assert_eq!(s.timer_color, ColorName::white());
        assert_eq!(s.timer_font, "Arial");
        assert!(s.recent_images.is_empty());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let s: AppSettings = serde_json::from_str(r#"{"timer_color":"Green"}"#).unwrap();
        assert_eq!(s.timer_color, ColorName::new("Green"));
        assert_eq!(s.red_alert_threshold, 60);
    }

    #[test]
    fn negative_thresholds_clamp_to_zero() {
        let s: AppSettings =
            serde_json::from_str(r#"{"yellow_alert_threshold":-5,"red_alert_threshold":-1}"#).unwrap();
        assert_eq!(s.yellow_alert_threshold, 0);
        assert_eq!(s.red_alert_threshold, 0);
    }

    #[test]
    fn recent_images_dedupe_and_bound() {
        let mut recent = RecentImages::new();
        assert!(recent.push("a.png"));
        assert!(!recent.push("a.png"));
        for i in 0..MAX_RECENT_IMAGES {
            recent.push(format!("{i}.png"));
        }
        assert_eq!(recent.len(), MAX_RECENT_IMAGES);
        assert!(!recent.iter().any(|p| p == "a.png"));
        assert_eq!(recent.iter().last(), Some("9.png"));
    }

    #[test]
    fn recent_images_deserialize_removes_duplicates() {
        let recent: RecentImages = serde_json::from_str(r#"["a","b","a","c"]"#).unwrap();
        assert_eq!(recent.as_slice(), &["a", "b", "c"]);
    }

    #[test]
    fn get_and_set_by_key() {
        let mut s = AppSettings::default();
        assert_eq!(s.get("timer_color").as_deref(), Some("White"));
        assert_eq!(s.get("red_alert_threshold").as_deref(), Some("60"));
        assert!(s.get("missing").is_none());

        s.set("red_alert_threshold", "30").unwrap();
        s.set("enable_animations", "false").unwrap();
        s.set("message_color", "Yellow").unwrap();
        assert_eq!(s.red_alert_threshold, 30);
        assert!(!s.enable_animations);
        assert_eq!(s.message_color, ColorName::yellow());
    }

    #[test]
    fn set_clamps_negative_threshold() {
        let mut s = AppSettings::default();
        s.set("yellow_alert_threshold", "-10").unwrap();
        assert_eq!(s.yellow_alert_threshold, 0);
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_type() {
        let mut s = AppSettings::default();
        assert!(matches!(s.set("nope", "1"), Err(SettingsError::UnknownKey(_))));
        assert!(matches!(
            s.set("is_topmost", "maybe"),
            Err(SettingsError::InvalidValue { .. })
        ));
    }

    #[test]
    fn inverted_thresholds_flagged() {
        let mut s = AppSettings::default();
        assert!(!s.thresholds_inverted());
        s.red_alert_threshold = 400;
        assert!(s.thresholds_inverted());
    }
}
