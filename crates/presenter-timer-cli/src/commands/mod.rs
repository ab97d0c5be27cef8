pub mod classify;
pub mod config;
pub mod image;
pub mod messages;
pub mod run;
pub mod settings;
pub mod size;

use presenter_timer_core::sizing::{AdvanceRatioMeasurer, FontMeasurer, TextMeasurer};
use presenter_timer_core::storage::ShellConfig;
use tracing::warn;

/// Pick a measurer: the configured font file, then a system font, then
/// the average advance ratio.
pub fn measurer(config: &ShellConfig) -> Box<dyn TextMeasurer> {
    if let Some(path) = &config.measure.font_path {
        match FontMeasurer::from_path(path) {
            Ok(font) => return Box::new(font),
            Err(e) => warn!(path = %path.display(), error = %e, "could not load font; falling back"),
        }
    }
    if let Some(font) = FontMeasurer::from_system_font() {
        return Box::new(font);
    }
    Box::new(AdvanceRatioMeasurer::new(config.measure.advance_ratio))
}
