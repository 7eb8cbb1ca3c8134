//! Sprites: immutable 1-bit stencils composited onto the pixel buffer
//!
//! A sprite only says which cells are opaque. The color is chosen at draw
//! time, so one stencil serves every entity that shares a shape.

pub mod animation;
pub mod art;

pub use animation::{AnimationState, SpriteAnimation};

use crate::error::{Error, Result};

/// Width x height occupancy mask, row-major, row 0 is the visual top
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    width: u32,
    height: u32,
    stencil: Vec<u8>,
}

impl Sprite {
    /// Build a sprite from a raw stencil (0 = transparent, anything else = opaque)
    pub fn new(width: u32, height: u32, stencil: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions {
                what: "sprite",
                width,
                height,
            });
        }
        let expected = width as usize * height as usize;
        if stencil.len() != expected {
            return Err(Error::StencilSize {
                expected,
                actual: stencil.len(),
            });
        }
        Ok(Self {
            width,
            height,
            stencil,
        })
    }

    /// Build a sprite from pixel-art rows, top row first.
    /// `.` and space are transparent, any other character is opaque.
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        let width = rows.first().map_or(0, |r| r.chars().count());
        if rows.iter().any(|r| r.chars().count() != width) {
            return Err(Error::StencilSize {
                expected: width * rows.len(),
                actual: rows.iter().map(|r| r.chars().count()).sum(),
            });
        }
        let stencil = rows
            .iter()
            .flat_map(|row| row.chars())
            .map(|c| u8::from(c != '.' && c != ' '))
            .collect();
        Self::new(width as u32, rows.len() as u32, stencil)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw occupancy values, row-major from the top
    pub fn stencil(&self) -> &[u8] {
        &self.stencil
    }

    /// Whether the cell at (sx, sy) is opaque. Out-of-range cells are transparent.
    #[inline]
    pub fn is_opaque(&self, sx: u32, sy: u32) -> bool {
        sx < self.width
            && sy < self.height
            && self.stencil[(sy * self.width + sx) as usize] != 0
    }

    /// Number of opaque cells
    pub fn opaque_count(&self) -> usize {
        self.stencil.iter().filter(|&&c| c != 0).count()
    }
}
