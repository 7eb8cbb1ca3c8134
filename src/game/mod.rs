//! Frame orchestration
//!
//! Each tick runs in a fixed order:
//! 1. clear the buffer to the background
//! 2. composite every formation member
//! 3. composite the player
//! 4. advance the formation animation
//! 5. move the player
//! 6. present the buffer
//!
//! Steps 4 and 5 are skipped while paused unless a single step is pending.

mod formation;
mod frame_loop;

pub use formation::Formation;
pub use frame_loop::{run, ControlState, RunOptions, NOMINAL_TICK_PERIOD};

use std::rc::Rc;

use crate::config::GameConfig;
use crate::display::{draw_sprite, PackedColor, PixelBuffer, Presenter};
use crate::error::Result;
use crate::motion::MotionState;
use crate::sprite::{art, Sprite};

pub struct Game {
    buffer: PixelBuffer,
    background: PackedColor,
    sprite_color: PackedColor,
    formation: Formation,
    player_sprite: Rc<Sprite>,
    player: MotionState,
    /// Ticks the simulation has advanced (paused ticks excluded)
    ticks: u64,
}

impl Game {
    /// Build the buffer, sprites and entities described by `config`
    pub fn new(config: &GameConfig) -> Result<Self> {
        config.validate()?;

        let buffer = PixelBuffer::new(config.buffer_width, config.buffer_height)?;
        let frames = art::alien_frames()?.into_iter().map(Rc::new).collect();
        let formation = Formation::new(&config.formation, frames)?;

        let player_sprite = Rc::new(art::player()?);
        let player = MotionState::new(
            config.player.x,
            config.player.y,
            config.player_direction()?,
            player_sprite.width(),
        );

        Ok(Self {
            buffer,
            background: config.background.packed(),
            sprite_color: config.sprite_color.packed(),
            formation,
            player_sprite,
            player,
            ticks: 0,
        })
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn formation(&self) -> &Formation {
        &self.formation
    }

    pub fn player(&self) -> &MotionState {
        &self.player
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Steps 1-3: draw the current state into the buffer
    pub fn render(&mut self) {
        self.buffer.fill(self.background);
        self.formation.draw(&mut self.buffer, self.sprite_color);
        draw_sprite(
            &mut self.buffer,
            &self.player_sprite,
            self.player.x,
            self.player.y,
            self.sprite_color,
        );
    }

    /// Steps 4-5: advance animation and motion by one tick
    pub fn advance(&mut self) {
        self.formation.advance();
        self.player.step(self.buffer.width());
        self.ticks += 1;
    }

    /// One full frame, presented through `presenter`
    pub fn tick<P: Presenter + ?Sized>(
        &mut self,
        control: &mut ControlState,
        presenter: &mut P,
    ) -> Result<()> {
        self.render();
        if control.take_advance() {
            self.advance();
        }
        presenter.present(&self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{Color, HeadlessPresenter};

    fn run_ticks(config: &GameConfig, n: u64) -> (Game, HeadlessPresenter) {
        let mut game = Game::new(config).unwrap();
        let mut presenter = HeadlessPresenter::new();
        let mut control = ControlState::default();
        for _ in 0..n {
            game.tick(&mut control, &mut presenter).unwrap();
        }
        (game, presenter)
    }

    #[test]
    fn test_first_frame_contents() {
        let config = GameConfig::default();
        let (game, _) = run_ticks(&config, 1);
        let buffer = game.buffer();
        let fg = config.sprite_color.packed();
        let [alien, _] = art::alien_frames().unwrap();
        let player = art::player().unwrap();

        // 55 aliens showing frame 0 plus the player, no overlaps
        assert_eq!(buffer.count(fg), 55 * alien.opaque_count() + player.opaque_count());
        assert_eq!(
            buffer.count(config.background.packed()),
            (224 * 256) as usize - buffer.count(fg)
        );
        // Player cannon tip: stencil (5, 0) lands at (107 + 5, 32 + 6)
        assert_eq!(buffer.get_color(112, 38), Some(config.sprite_color));
    }

    #[test]
    fn test_render_uses_pre_advance_state() {
        let config = GameConfig::default();
        let (game, presenter) = run_ticks(&config, 1);
        // Player was drawn at 107 and then moved to 108
        assert_eq!(game.player().x, 108);
        assert_eq!(presenter.frames(), 1);
        assert_eq!(presenter.last_checksum(), Some(game.buffer().checksum()));
    }

    #[test]
    fn test_formation_switches_frame_after_duration() {
        let config = GameConfig::default();
        let (a, _) = run_ticks(&config, 10);
        let (b, _) = run_ticks(&config, 11);
        // Tick 11 renders elapsed = 10, the second frame
        assert_eq!(a.formation().animation().unwrap().frame_index(), 1);
        let [_, frame_b] = art::alien_frames().unwrap();
        let member = b.formation().members()[0];
        let fg = config.sprite_color.packed();
        for sy in 0..frame_b.height() {
            for sx in 0..frame_b.width() {
                let x = member.x + sx as i32;
                let y = member.y + (frame_b.height() - 1 - sy) as i32;
                let expected = frame_b.is_opaque(sx, sy);
                assert_eq!(b.buffer().get_pixel(x, y) == Some(fg), expected);
            }
        }
    }

    #[test]
    fn test_end_to_end_is_deterministic() {
        let config = GameConfig::default();
        let (a, pa) = run_ticks(&config, 500);
        let (b, pb) = run_ticks(&config, 500);
        assert_eq!(a.buffer(), b.buffer());
        assert_eq!(pa.last_checksum(), pb.last_checksum());
        assert_eq!(a.player(), b.player());

        let (c, _) = run_ticks(&config, 501);
        assert_ne!(a.buffer().checksum(), c.buffer().checksum());
    }

    #[test]
    fn test_player_bounces_within_buffer() {
        let config = GameConfig::default();
        let mut game = Game::new(&config).unwrap();
        let mut presenter = HeadlessPresenter::new();
        let mut control = ControlState::default();
        let mut min_x = i32::MAX;
        let mut max_x = i32::MIN;
        for _ in 0..1_000 {
            game.tick(&mut control, &mut presenter).unwrap();
            min_x = min_x.min(game.player().x);
            max_x = max_x.max(game.player().x);
        }
        assert_eq!(min_x, 0);
        assert_eq!(max_x, 211);
    }

    #[test]
    fn test_custom_colors() {
        let config = GameConfig {
            background: Color::BLACK,
            sprite_color: Color::new(255, 255, 255),
            ..GameConfig::default()
        };
        let (game, _) = run_ticks(&config, 1);
        assert_eq!(game.buffer().get_color(0, 0), Some(Color::BLACK));
    }

    #[test]
    fn test_invalid_config_fails_construction() {
        let config = GameConfig {
            buffer_height: 0,
            ..GameConfig::default()
        };
        assert!(Game::new(&config).is_err());
    }

    #[test]
    fn test_out_of_range_layout_fails_construction() {
        let mut config = GameConfig::default();
        config.formation.spacing_x = i32::MAX;
        assert!(Game::new(&config).is_err());

        let mut config = GameConfig::default();
        config.player.x = i32::MAX - 5;
        assert!(Game::new(&config).is_err());
    }
}
