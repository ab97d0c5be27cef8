//! Colour names and the named-colour resolver.
//!
//! The countdown core never interprets colours: it moves [`ColorName`]s
//! around and leaves resolution to a [`ColorResolver`] supplied by the shell.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque colour name such as `"White"` or `"Red"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorName(String);

impl ColorName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn white() -> Self {
        Self::new("White")
    }

    pub fn black() -> Self {
        Self::new("Black")
    }

    pub fn yellow() -> Self {
        Self::new("Yellow")
    }

    /// The alert colour used for the Critical tier and the flash cadence.
    pub fn red() -> Self {
        Self::new("Red")
    }
}

impl fmt::Display for ColorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColorName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ColorName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A renderable colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    /// `#RRGGBB`, or `#RRGGBBAA` when not opaque.
    pub fn to_hex(self) -> String {
        if self.a == 0xFF {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Packed `0xAARRGGBB`.
    pub fn to_argb(self) -> u32 {
        (u32::from(self.a) << 24) | (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

/// Maps colour names to renderable values.
pub trait ColorResolver {
    fn resolve(&self, name: &ColorName) -> Option<Rgba>;
}

/// The fixed palette offered by the control panel.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamedPalette;

const PALETTE: &[(&str, Rgba)] = &[
    ("White", Rgba::opaque(0xFF, 0xFF, 0xFF)),
    ("Black", Rgba::opaque(0x00, 0x00, 0x00)),
    ("Red", Rgba::opaque(0xFF, 0x00, 0x00)),
    ("Yellow", Rgba::opaque(0xFF, 0xFF, 0x00)),
    ("Green", Rgba::opaque(0x00, 0x80, 0x00)),
    ("Blue", Rgba::opaque(0x00, 0x00, 0xFF)),
    ("Orange", Rgba::opaque(0xFF, 0xA5, 0x00)),
    ("Gray", Rgba::opaque(0x80, 0x80, 0x80)),
    ("DarkBlue", Rgba::opaque(0x00, 0x00, 0x8B)),
    ("DarkGreen", Rgba::opaque(0x00, 0x64, 0x00)),
    ("Purple", Rgba::opaque(0x80, 0x00, 0x80)),
];

impl NamedPalette {
    pub fn names() -> impl Iterator<Item = &'static str> {
        PALETTE.iter().map(|(name, _)| *name)
    }

    /// The palette's spelling of `name`, e.g. `"darkblue"` -> `"DarkBlue"`.
    pub fn canonical(name: &str) -> Option<ColorName> {
        PALETTE
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name.trim()))
            .map(|(candidate, _)| ColorName::new(*candidate))
    }
}

impl ColorResolver for NamedPalette {
    fn resolve(&self, name: &ColorName) -> Option<Rgba> {
        PALETTE
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name.as_str()))
            .map(|(_, rgba)| *rgba)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_lookup_is_case_insensitive() {
        let palette = NamedPalette;
        assert_eq!(
            palette.resolve(&ColorName::new("yellow")),
            Some(Rgba::opaque(0xFF, 0xFF, 0x00))
        );
        assert_eq!(palette.resolve(&ColorName::new("Magenta")), None);
    }

    #[test]
    fn canonical_spelling() {
        assert_eq!(NamedPalette::canonical(" darkblue "), Some(ColorName::new("DarkBlue")));
        assert_eq!(NamedPalette::canonical("Chartreuse"), None);
    }

    #[test]
    fn hex_rendering() {
        assert_eq!(Rgba::opaque(0xFF, 0xA5, 0x00).to_hex(), "#FFA500");
        assert_eq!(Rgba { r: 0, g: 0, b: 0, a: 0x80 }.to_hex(), "#00000080");
    }

    #[test]
    fn argb_packing() {
        assert_eq!(Rgba::opaque(0xFF, 0x00, 0x00).to_argb(), 0xFFFF_0000);
    }

    #[test]
    fn color_name_serializes_as_plain_string() {
        let json = serde_json::to_string(&ColorName::white()).unwrap();
        assert_eq!(json, "\"White\"");
    }
}
