//! Game configuration
//!
//! Loaded from JSON. Every field has a default, so a partial file only needs
//! the values it changes.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::display::Color;
use crate::error::{Error, Result};
use crate::motion::Direction;

pub const DEFAULT_WIDTH: u32 = 224;
pub const DEFAULT_HEIGHT: u32 = 256;
pub const DEFAULT_SCALE: u32 = 3;
/// Largest buffer side accepted from a config
pub const MAX_BUFFER_SIDE: u32 = 8192;

/// Layout and animation timing of the alien formation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationConfig {
    pub rows: u32,
    pub columns: u32,
    pub origin_x: i32,
    pub origin_y: i32,
    pub spacing_x: i32,
    pub spacing_y: i32,
    /// Ticks each animation frame stays on screen
    pub frame_duration: u32,
    pub looping: bool,
}

impl Default for FormationConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            columns: 11,
            origin_x: 20,
            origin_y: 128,
            spacing_x: 16,
            spacing_y: 17,
            frame_duration: 10,
            looping: true,
        }
    }
}

/// Starting state of the player actor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub x: i32,
    pub y: i32,
    /// +1 moves right, -1 moves left
    pub direction: i32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            x: 112 - 5,
            y: 32,
            direction: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub buffer_width: u32,
    pub buffer_height: u32,
    /// Window size is the buffer size times this factor
    pub window_scale: u32,
    pub vsync: bool,
    pub background: Color,
    pub sprite_color: Color,
    pub formation: FormationConfig,
    pub player: PlayerConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            buffer_width: DEFAULT_WIDTH,
            buffer_height: DEFAULT_HEIGHT,
            window_scale: DEFAULT_SCALE,
            vsync: true,
            background: Color::new(0, 128, 0),
            sprite_color: Color::new(128, 0, 0),
            formation: FormationConfig::default(),
            player: PlayerConfig::default(),
        }
    }
}

impl GameConfig {
    /// Load and validate a config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Reject values that would fail later during construction
    pub fn validate(&self) -> Result<()> {
        if self.buffer_width == 0 || self.buffer_height == 0 {
            return Err(Error::InvalidDimensions {
                what: "buffer",
                width: self.buffer_width,
                height: self.buffer_height,
            });
        }
        if self.buffer_width > MAX_BUFFER_SIDE || self.buffer_height > MAX_BUFFER_SIDE {
            return Err(Error::Config(format!(
                "buffer {}x{} exceeds {} pixels per side",
                self.buffer_width, self.buffer_height, MAX_BUFFER_SIDE
            )));
        }
        if self.window_scale == 0 {
            return Err(Error::Config("window_scale must be at least 1".into()));
        }
        if self.formation.frame_duration == 0 {
            return Err(Error::ZeroFrameDuration);
        }
        self.validate_layout()?;
        self.player_direction()?;
        Ok(())
    }

    /// Positions, spacings and counts are capped at [`MAX_BUFFER_SIDE`] in
    /// magnitude so member layout and motion arithmetic cannot overflow `i32`.
    /// Positions may still lie off screen; drawing clips them.
    fn validate_layout(&self) -> Result<()> {
        let max = MAX_BUFFER_SIDE as i64;
        let f = &self.formation;
        let values = [
            ("formation.rows", f.rows as i64),
            ("formation.columns", f.columns as i64),
            ("formation.origin_x", f.origin_x as i64),
            ("formation.origin_y", f.origin_y as i64),
            ("formation.spacing_x", f.spacing_x as i64),
            ("formation.spacing_y", f.spacing_y as i64),
            ("player.x", self.player.x as i64),
            ("player.y", self.player.y as i64),
        ];
        for (name, value) in values {
            if value.abs() > max {
                return Err(Error::Config(format!(
                    "{} = {} is outside -{}..={}",
                    name, value, max, max
                )));
            }
        }
        Ok(())
    }

    pub fn player_direction(&self) -> Result<Direction> {
        Direction::from_sign(self.player.direction).ok_or_else(|| {
            Error::Config(format!(
                "player direction must be 1 or -1, got {}",
                self.player.direction
            ))
        })
    }

    pub fn window_size(&self) -> (u32, u32) {
        (
            self.buffer_width.saturating_mul(self.window_scale),
            self.buffer_height.saturating_mul(self.window_scale),
        )
    }
}
