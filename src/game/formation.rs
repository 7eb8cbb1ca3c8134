//! The stationary alien formation
//!
//! All members share one animation instance and so march in lockstep: every
//! member shows the same frame on the same tick. When a non-looping
//! animation finishes it is dropped and members show the rest sprite.

use log::debug;
use std::rc::Rc;

use crate::config::FormationConfig;
use crate::display::{draw_sprite, PackedColor, PixelBuffer};
use crate::error::{Error, Result};
use crate::sprite::{AnimationState, Sprite, SpriteAnimation};

/// Grid position of one formation member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Member {
    pub x: i32,
    pub y: i32,
}

pub struct Formation {
    members: Vec<Member>,
    rest_sprite: Rc<Sprite>,
    animation: Option<SpriteAnimation>,
}

impl Formation {
    /// Lay out `rows x columns` members from the config and attach the
    /// shared animation built from `frames`
    pub fn new(config: &FormationConfig, frames: Vec<Rc<Sprite>>) -> Result<Self> {
        let animation = SpriteAnimation::new(frames, config.frame_duration, config.looping)?;
        let rest_sprite = Rc::clone(animation.current_frame());

        let mut members = Vec::new();
        for row in 0..config.rows {
            for col in 0..config.columns {
                members.push(Member {
                    x: layout_axis(config.origin_x, config.spacing_x, col)?,
                    y: layout_axis(config.origin_y, config.spacing_y, row)?,
                });
            }
        }

        Ok(Self {
            members,
            rest_sprite,
            animation: Some(animation),
        })
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn animation(&self) -> Option<&SpriteAnimation> {
        self.animation.as_ref()
    }

    /// Sprite every member shows this tick
    pub fn current_sprite(&self) -> &Rc<Sprite> {
        match &self.animation {
            Some(animation) => animation.current_frame(),
            None => &self.rest_sprite,
        }
    }

    pub fn draw(&self, buffer: &mut PixelBuffer, color: PackedColor) {
        let sprite = self.current_sprite();
        for member in &self.members {
            draw_sprite(buffer, sprite, member.x, member.y, color);
        }
    }

    /// Advance the shared animation one tick, dropping it once it terminates
    pub fn advance(&mut self) {
        if let Some(animation) = &mut self.animation {
            if animation.advance() == AnimationState::Terminated {
                debug!(
                    "formation animation finished after {} ticks",
                    animation.total_duration()
                );
                self.animation = None;
            }
        }
    }
}

/// `origin + spacing * index`, rejected if it leaves the `i32` range
fn layout_axis(origin: i32, spacing: i32, index: u32) -> Result<i32> {
    let value = origin as i64 + spacing as i64 * index as i64;
    i32::try_from(value).map_err(|_| {
        Error::Config(format!(
            "formation member at {} + {} * {} is out of range",
            origin, spacing, index
        ))
    })
}
