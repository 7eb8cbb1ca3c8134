use super::color::{Color, PackedColor};
use crate::error::{Error, Result};

// ============================================================================
// Pixel Buffer
// ============================================================================

/// Off-screen frame in packed `0xRRGGBBAA` pixels, row-major
///
/// Row 0 is the bottom of the screen. Presenters flip vertically when they
/// hand the rows to a top-down display surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<PackedColor>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Allocate a zero-filled buffer. Both dimensions must be positive.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions {
                what: "buffer",
                width,
                height,
            });
        }
        Ok(Self {
            pixels: vec![0; width as usize * height as usize],
            width,
            height,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Calculate pixel offset for (x, y)
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Fill every pixel with one color
    pub fn clear(&mut self, color: Color) {
        self.fill(color.packed());
    }

    /// Fill every pixel with an already packed value
    pub fn fill(&mut self, pixel: PackedColor) {
        self.pixels.fill(pixel);
    }

    /// Set a single pixel (bounds checked, out-of-range writes are dropped)
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, pixel: PackedColor) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            self.pixels[idx] = pixel;
        }
    }

    /// Read a pixel. Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<PackedColor> {
        if self.in_bounds(x, y) {
            Some(self.pixels[self.pixel_index(x as u32, y as u32)])
        } else {
            None
        }
    }

    /// Read a pixel as an RGB color
    #[inline]
    pub fn get_color(&self, x: i32, y: i32) -> Option<Color> {
        self.get_pixel(x, y).map(Color::from_packed)
    }

    /// One row of pixels, row 0 at the bottom
    pub fn row(&self, y: u32) -> Option<&[PackedColor]> {
        if y >= self.height {
            return None;
        }
        let start = self.pixel_index(0, y);
        Some(&self.pixels[start..start + self.width as usize])
    }

    pub fn pixels(&self) -> &[PackedColor] {
        &self.pixels
    }

    /// Raw bytes for SDL texture upload (native-endian `u32` pixels)
    pub fn as_bytes(&self) -> &[u8] {
        // Safety: u8 has alignment 1 and every bit pattern is valid, and the
        // byte length is exactly the length of the u32 allocation.
        unsafe {
            std::slice::from_raw_parts(
                self.pixels.as_ptr().cast::<u8>(),
                self.pixels.len() * std::mem::size_of::<PackedColor>(),
            )
        }
    }

    /// Bytes per row for texture upload
    #[inline]
    pub fn pitch(&self) -> usize {
        self.width as usize * std::mem::size_of::<PackedColor>()
    }

    /// FNV-1a hash of the pixel contents, for comparing frames cheaply
    pub fn checksum(&self) -> u64 {
        const OFFSET: u64 = 0xcbf29ce484222325;
        const PRIME: u64 = 0x100000001b3;
        self.pixels
            .iter()
            .flat_map(|p| p.to_be_bytes())
            .fold(OFFSET, |hash, byte| (hash ^ byte as u64).wrapping_mul(PRIME))
    }

    /// Count pixels equal to `pixel`
    pub fn count(&self, pixel: PackedColor) -> usize {
        self.pixels.iter().filter(|&&p| p == pixel).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::color::pack_color;

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert!(matches!(
            PixelBuffer::new(0, 10),
            Err(Error::InvalidDimensions { width: 0, height: 10, .. })
        ));
        assert!(PixelBuffer::new(10, 0).is_err());
        assert!(PixelBuffer::new(0, 0).is_err());
    }

    #[test]
    fn test_new_is_zeroed() {
        let buffer = PixelBuffer::new(4, 3).unwrap();
        assert_eq!(buffer.pixels().len(), 12);
        assert!(buffer.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_clear_sets_every_cell() {
        let color = Color::new(0, 128, 0);
        for (w, h) in [(1, 1), (1, 7), (7, 1), (224, 256), (13, 5)] {
            let mut buffer = PixelBuffer::new(w, h).unwrap();
            buffer.set_pixel(0, 0, 0xDEADBEEF);
            buffer.clear(color);
            for y in 0..h as i32 {
                for x in 0..w as i32 {
                    assert_eq!(buffer.get_color(x, y), Some(color));
                }
            }
        }
    }

    #[test]
    fn test_set_pixel_out_of_bounds_is_dropped() {
        let mut buffer = PixelBuffer::new(4, 4).unwrap();
        let before = buffer.clone();
        buffer.set_pixel(-1, 0, 1);
        buffer.set_pixel(0, -1, 1);
        buffer.set_pixel(4, 0, 1);
        buffer.set_pixel(0, 4, 1);
        assert_eq!(buffer, before);
        assert_eq!(buffer.get_pixel(4, 0), None);
    }

    #[test]
    fn test_row_major_layout() {
        let mut buffer = PixelBuffer::new(3, 2).unwrap();
        buffer.set_pixel(2, 1, 7);
        assert_eq!(buffer.pixels()[5], 7);
        assert_eq!(buffer.row(1), Some(&[0, 0, 7][..]));
        assert_eq!(buffer.row(2), None);
    }

    #[test]
    fn test_as_bytes_matches_native_pixels() {
        let mut buffer = PixelBuffer::new(2, 1).unwrap();
        buffer.set_pixel(1, 0, pack_color(1, 2, 3));
        let bytes = buffer.as_bytes();
        assert_eq!(bytes.len(), 8);
        assert_eq!(buffer.pitch(), 8);
        assert_eq!(&bytes[4..8], &pack_color(1, 2, 3).to_ne_bytes());
    }

    #[test]
    fn test_checksum_tracks_content() {
        let mut a = PixelBuffer::new(8, 8).unwrap();
        let b = a.clone();
        assert_eq!(a.checksum(), b.checksum());
        a.set_pixel(3, 3, 1);
        assert_ne!(a.checksum(), b.checksum());
    }
}
