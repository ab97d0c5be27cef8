//! What the core hands to a render surface. The core never draws.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::color::ColorName;
use crate::sizing::SizingTarget;

/// One line of styled text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub text: String,
    pub font_family: String,
    /// `None` until the surface has been laid out once.
    pub font_size: Option<f32>,
    pub color: ColorName,
}

/// Background behind the timer and message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Backdrop {
    Color(ColorName),
    Image(PathBuf),
}

/// Everything one surface needs to draw itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub target: SizingTarget,
    pub timer: TextStyle,
    pub message: TextStyle,
    pub backdrop: Backdrop,
    /// Whether the surface may fade text and backdrop changes in.
    pub fade_in: bool,
}

/// A display or preview pane owned by the shell.
pub trait RenderSurface {
    fn render(&mut self, frame: &Frame);
}

impl<F> RenderSurface for F
where
    F: FnMut(&Frame),
{
    fn render(&mut self, frame: &Frame) {
        self(frame)
    }
}
