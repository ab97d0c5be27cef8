//! Text width measurement.

use std::fs;
use std::path::{Path, PathBuf};

use fontdue::{Font, FontSettings};
use tracing::debug;

use crate::error::{CoreError, Result};

/// Measures the rendered width of a single line of text.
pub trait TextMeasurer {
    /// Width in pixels of `text` set in `font_family` at `font_size` px.
    fn measure(&self, text: &str, font_family: &str, font_size: f32) -> f32;
}

/// Approximates width as `chars * font_size * ratio`.
///
/// Digits and colons in most sans-serif faces advance about 0.55 em, which
/// is close enough for headless runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvanceRatioMeasurer {
    pub ratio: f32,
}

pub const DEFAULT_ADVANCE_RATIO: f32 = 0.55;

impl Default for AdvanceRatioMeasurer {
    fn default() -> Self {
        Self {
            ratio: DEFAULT_ADVANCE_RATIO,
        }
    }
}

impl AdvanceRatioMeasurer {
    pub fn new(ratio: f32) -> Self {
        Self { ratio }
    }
}

impl TextMeasurer for AdvanceRatioMeasurer {
    fn measure(&self, text: &str, _font_family: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * self.ratio
    }
}

/// Sums glyph advance widths from a TrueType font.
///
/// One face serves every family name; family selection is the shell's
/// concern.
#[derive(Debug)]
pub struct FontMeasurer {
    font: Font,
    path: PathBuf,
}

impl FontMeasurer {
    /// Load a TrueType font from a file path
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let font_data = fs::read(&path)?;
        let font = Font::from_bytes(font_data, FontSettings::default()).map_err(|e| {
            CoreError::invalid_input("font_path", format!("failed to parse {}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), "loaded measurement font");
        Ok(Self { font, path })
    }

    /// Try a handful of common system font locations.
    pub fn from_system_font() -> Option<Self> {
        const FONT_PATHS: [&str; 6] = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
            "/Library/Fonts/Arial.ttf",
            "C:\\Windows\\Fonts\\arial.ttf",
        ];
        FONT_PATHS.iter().find_map(|p| Self::from_path(p).ok())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TextMeasurer for FontMeasurer {
    fn measure(&self, text: &str, _font_family: &str, font_size: f32) -> f32 {
        text.chars()
            .map(|ch| self.font.metrics(ch, font_size).advance_width)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_measurer_is_linear_in_size_and_length() {
        let m = AdvanceRatioMeasurer::new(0.5);
        assert_eq!(m.measure("0000", "Arial", 10.0), 20.0);
        assert_eq!(m.measure("00:00:00", "Arial", 100.0), 400.0);
        assert_eq!(m.measure("", "Arial", 100.0), 0.0);
    }

    #[test]
    fn missing_font_file_is_an_error() {
        assert!(FontMeasurer::from_path("/definitely/not/a/font.ttf").is_err());
    }
}
