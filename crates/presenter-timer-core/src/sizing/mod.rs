//! Adaptive text sizing for the display surface and its previews.
//!
//! Sizes are computed for the primary (audience) surface and then carried to
//! every preview pane in proportion to its width, so a preview always shows
//! a scaled-down copy of what the audience sees.

mod measure;
mod policy;

pub use measure::{AdvanceRatioMeasurer, FontMeasurer, TextMeasurer, DEFAULT_ADVANCE_RATIO};
pub use policy::{
    message_font_size, message_width_percentage, timer_font_size, SizingSkip,
    MESSAGE_DEFAULT_VALUE, MESSAGE_MAX_HEIGHT_RATIO, MESSAGE_MAX_VALUE, MESSAGE_MIN_VALUE,
    MESSAGE_SCALE, TIMER_MAX_WIDTH_RATIO, TIMER_MIN_FONT_PX, TIMER_SCALE,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A surface that renders timer and message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingTarget {
    Primary,
    Preview(usize),
}

/// Pixel dimensions of a laid-out surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    fn usable(&self) -> bool {
        self.width.is_finite() && self.width > 0.0
    }
}

/// Current dimensions of every surface. `None` means not laid out yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceLayout {
    primary: Option<SurfaceSize>,
    previews: Vec<Option<SurfaceSize>>,
}

impl SurfaceLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primary(&self) -> Option<SurfaceSize> {
        self.primary.filter(SurfaceSize::usable)
    }

    pub fn set_primary(&mut self, size: SurfaceSize) {
        self.primary = Some(size);
    }

    pub fn clear_primary(&mut self) {
        self.primary = None;
    }

    /// Register a preview pane and return its index.
    pub fn add_preview(&mut self, size: Option<SurfaceSize>) -> usize {
        self.previews.push(size);
        self.previews.len() - 1
    }

    /// Returns false for an unknown preview index.
    pub fn set_preview(&mut self, index: usize, size: SurfaceSize) -> bool {
        match self.previews.get_mut(index) {
            Some(slot) => {
                *slot = Some(size);
                true
            }
            None => false,
        }
    }

    pub fn preview(&self, index: usize) -> Option<SurfaceSize> {
        self.previews.get(index).copied().flatten().filter(SurfaceSize::usable)
    }

    pub fn preview_count(&self) -> usize {
        self.previews.len()
    }

    pub fn targets(&self) -> impl Iterator<Item = SizingTarget> + '_ {
        std::iter::once(SizingTarget::Primary).chain((0..self.previews.len()).map(SizingTarget::Preview))
    }

    pub fn size_of(&self, target: SizingTarget) -> Option<SurfaceSize> {
        match target {
            SizingTarget::Primary => self.primary(),
            SizingTarget::Preview(i) => self.preview(i),
        }
    }
}

/// `primary * preview_width / primary_width`.
pub fn preview_font_size(primary_size: f32, primary_width: f32, preview_width: f32) -> f32 {
    primary_size * (preview_width / primary_width)
}

/// Resolved font sizes for one kind of text across all targets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SizedText {
    pub primary: Option<f32>,
    pub previews: Vec<Option<f32>>,
}

impl SizedText {
    pub fn font_size(&self, target: SizingTarget) -> Option<f32> {
        match target {
            SizingTarget::Primary => self.primary,
            SizingTarget::Preview(i) => self.previews.get(i).copied().flatten(),
        }
    }

    /// Store a new primary size and carry it to every laid-out preview.
    /// Previews without dimensions keep their previous size.
    fn apply(&mut self, primary: f32, layout: &SurfaceLayout) {
        self.primary = Some(primary);
        self.previews.resize(layout.preview_count(), None);
        let Some(primary_surface) = layout.primary() else {
            return;
        };
        for (index, slot) in self.previews.iter_mut().enumerate() {
            if let Some(preview) = layout.preview(index) {
                *slot = Some(preview_font_size(primary, primary_surface.width, preview.width));
            }
        }
    }
}

/// Keeps the last good timer and message sizes and recomputes them on demand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdaptiveSizer {
    timer: SizedText,
    message: SizedText,
}

impl AdaptiveSizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timer(&self) -> &SizedText {
        &self.timer
    }

    pub fn message(&self) -> &SizedText {
        &self.message
    }

    /// Recompute the timer size for the live `text`.
    ///
    /// Returns the new primary size. Unknown dimensions and measurement
    /// faults leave the previous sizes in place.
    pub fn resize_timer(
        &mut self,
        layout: &SurfaceLayout,
        preference: f32,
        text: &str,
        font_family: &str,
        measurer: &dyn TextMeasurer,
    ) -> Result<f32, SizingSkip> {
        let width = layout.primary().map(|s| s.width).unwrap_or(0.0);
        let size = timer_font_size(width, preference, text, font_family, measurer)
            .inspect_err(|skip| report_skip("timer", *skip))?;
        debug!(size, text, "timer font resized");
        self.timer.apply(size, layout);
        Ok(size)
    }

    /// Recompute the message size from the slider `value`.
    pub fn resize_message(&mut self, layout: &SurfaceLayout, value: f32) -> Result<f32, SizingSkip> {
        let primary = layout.primary();
        let width = primary.map(|s| s.width).unwrap_or(0.0);
        let size = message_font_size(width, primary.map(|s| s.height), value)
            .inspect_err(|skip| report_skip("message", *skip))?;
        debug!(size, value, "message font resized");
        self.message.apply(size, layout);
        Ok(size)
    }
}

fn report_skip(kind: &str, skip: SizingSkip) {
    match skip {
        SizingSkip::NotLaidOut => debug!(kind, "sizing skipped: surface not laid out"),
        SizingSkip::MeasurementFault => {
            warn!(kind, "text measurement failed; keeping last good font size")
        }
    }
}
