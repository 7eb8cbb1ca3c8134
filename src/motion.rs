//! Horizontal bounce motion for the player actor
//!
//! The actor moves one pixel per tick and reflects one pixel before it
//! touches the right edge. The left edge reflects at x = 0.

use log::trace;

/// Direction of travel along the x axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }

    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Map a config sign to a direction. Only +1 and -1 are valid.
    pub fn from_sign(sign: i32) -> Option<Self> {
        match sign {
            1 => Some(Self::Right),
            -1 => Some(Self::Left),
            _ => None,
        }
    }
}

/// Position and heading of a bouncing actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionState {
    pub x: i32,
    pub y: i32,
    pub direction: Direction,
    /// Width of the actor's sprite
    pub width: i32,
}

impl MotionState {
    pub fn new(x: i32, y: i32, direction: Direction, width: u32) -> Self {
        Self {
            x,
            y,
            direction,
            width: width as i32,
        }
    }

    /// Advance one tick inside a buffer `buffer_width` pixels wide.
    /// Returns true if the actor reflected this tick.
    pub fn step(&mut self, buffer_width: u32) -> bool {
        let limit = i32::try_from(buffer_width).unwrap_or(i32::MAX);
        let d = self.direction.sign();

        if self.x.saturating_add(self.width).saturating_add(d) >= limit - 1 {
            self.x = limit.saturating_sub(self.width).saturating_sub(d + 1);
            self.direction = self.direction.reversed();
            trace!("actor reflected at right edge, x = {}", self.x);
            true
        } else if self.x.saturating_add(d) <= 0 {
            self.x = 0;
            self.direction = self.direction.reversed();
            trace!("actor reflected at left edge");
            true
        } else {
            self.x += d;
            false
        }
    }
}
