//! Color model
//!
//! Pixels are stored as packed `u32` values laid out `0xRRGGBBAA`, which is
//! exactly what SDL's `RGBA8888` texture format expects in native byte order.

use serde::{Deserialize, Serialize};

/// A packed `0xRRGGBBAA` pixel
pub type PackedColor = u32;

/// Alpha channel is always fully opaque
const OPAQUE: u32 = 0xFF;

/// Pack an RGB triple into a buffer pixel: `r<<24 | g<<16 | b<<8 | 0xFF`
#[inline]
pub const fn pack_color(r: u8, g: u8, b: u8) -> PackedColor {
    ((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | OPAQUE
}

/// Recover the RGB channels of a packed pixel (alpha is dropped)
#[inline]
pub const fn unpack_color(pixel: PackedColor) -> (u8, u8, u8) {
    ((pixel >> 24) as u8, (pixel >> 16) as u8, (pixel >> 8) as u8)
}

/// An opaque 8-bit RGB color
///
/// Serializes as a `[r, g, b]` array so config files stay compact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from wider integers, clamping each channel into 0..=255
    pub fn saturating(r: i32, g: i32, b: i32) -> Self {
        let clamp = |v: i32| v.clamp(0, 255) as u8;
        Self::new(clamp(r), clamp(g), clamp(b))
    }

    #[inline]
    pub const fn packed(self) -> PackedColor {
        pack_color(self.r, self.g, self.b)
    }

    #[inline]
    pub const fn from_packed(pixel: PackedColor) -> Self {
        let (r, g, b) = unpack_color(pixel);
        Self::new(r, g, b)
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Color> for [u8; 3] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b]
    }
}

impl From<Color> for PackedColor {
    fn from(c: Color) -> Self {
        c.packed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_pack_layout() {
        assert_eq!(pack_color(0x12, 0x34, 0x56), 0x123456FF);
        assert_eq!(pack_color(0, 0, 0), 0x000000FF);
        assert_eq!(pack_color(255, 255, 255), 0xFFFFFFFF);
    }

    #[test]
    fn test_pack_recovers_channels() {
        // Sweep each channel fully while holding the others at awkward values
        for v in 0..=255u8 {
            assert_eq!(unpack_color(pack_color(v, 7, 200)), (v, 7, 200));
            assert_eq!(unpack_color(pack_color(13, v, 99)), (13, v, 99));
            assert_eq!(unpack_color(pack_color(250, 1, v)), (250, 1, v));
        }
    }

    #[test]
    fn test_pack_injective_on_sample() {
        let mut seen = HashSet::new();
        for r in (0..=255u8).step_by(17) {
            for g in (0..=255u8).step_by(15) {
                for b in (0..=255u8).step_by(51) {
                    assert!(seen.insert(pack_color(r, g, b)), "collision at {r},{g},{b}");
                }
            }
        }
    }

    #[test]
    fn test_alpha_always_opaque() {
        assert_eq!(Color::new(1, 2, 3).packed() & 0xFF, 0xFF);
    }

    #[test]
    fn test_saturating_clamps_instead_of_wrapping() {
        assert_eq!(Color::saturating(-5, 300, 128), Color::new(0, 255, 128));
        assert_eq!(Color::saturating(256, 0, -1), Color::new(255, 0, 0));
    }

    #[test]
    fn test_color_serializes_as_array() {
        let json = serde_json::to_string(&Color::new(0, 128, 0)).unwrap();
        assert_eq!(json, "[0,128,0]");
        let back: Color = serde_json::from_str("[128,0,0]").unwrap();
        assert_eq!(back, Color::new(128, 0, 0));
    }

    #[test]
    fn test_out_of_range_channel_rejected_by_serde() {
        assert!(serde_json::from_str::<Color>("[256,0,0]").is_err());
    }
}
