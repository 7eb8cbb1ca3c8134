//! Sprite compositing
//!
//! Stencil row 0 is the top of the sprite while buffer rows grow upward, so
//! the blit flips vertically: the sprite occupies rows
//! `origin_y ..= origin_y + height - 1`, with its top row at the high end.
//!
//! Coordinates are signed. Cells landing left of, below, right of or above
//! the buffer are skipped.

use super::color::PackedColor;
use super::pixel_buffer::PixelBuffer;
use crate::sprite::Sprite;

/// Destination cell for stencil cell (sx, sy) with the sprite origin at (x, y)
#[inline]
pub fn destination(sprite: &Sprite, x: i32, y: i32, sx: u32, sy: u32) -> (i64, i64) {
    let dest_x = x as i64 + sx as i64;
    let dest_y = sprite.height() as i64 - 1 + y as i64 - sy as i64;
    (dest_x, dest_y)
}

/// Write `color` into every buffer cell covered by an opaque stencil cell
pub fn draw_sprite(buffer: &mut PixelBuffer, sprite: &Sprite, x: i32, y: i32, color: PackedColor) {
    let width = buffer.width() as i64;
    let height = buffer.height() as i64;

    for sy in 0..sprite.height() {
        for sx in 0..sprite.width() {
            if !sprite.is_opaque(sx, sy) {
                continue;
            }
            // i64 keeps the sum exact even at the extremes of i32 origins
            let (dx, dy) = destination(sprite, x, y, sx, sy);
            if dx < 0 || dx >= width || dy < 0 || dy >= height {
                continue;
            }
            buffer.set_pixel(dx as i32, dy as i32, color);
        }
    }
}
