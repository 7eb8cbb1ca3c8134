//! Tick-driven frame loop
//!
//! One iteration per displayed frame. The loop owns no input of its own:
//! input sources write into a [`ControlState`] that is checked every tick.

use log::{debug, info};
use std::time::Duration;

use super::Game;
use crate::control::{Command, InputSource};
use crate::display::Presenter;
use crate::error::Result;
use crate::util::{FpsCounter, FramePacer};

/// One tick at 60 Hz, for runs with nothing else setting the pace
pub const NOMINAL_TICK_PERIOD: Duration = Duration::from_micros(16_667);

/// Flags the input collaborators set and the loop reads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlState {
    quit_requested: bool,
    paused: bool,
    step_requested: bool,
}

impl ControlState {
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Quit => self.quit_requested = true,
            Command::TogglePause => self.paused = !self.paused,
            Command::Pause => self.paused = true,
            Command::Resume => self.paused = false,
            Command::Step => self.step_requested = true,
        }
        // A step only means something while paused
        if !self.paused {
            self.step_requested = false;
        }
        if matches!(command, Command::TogglePause | Command::Pause | Command::Resume) {
            debug!("paused = {}", self.paused);
        }
    }

    #[inline]
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the simulation advances this tick. Consumes a pending step.
    pub fn take_advance(&mut self) -> bool {
        if !self.paused {
            return true;
        }
        std::mem::take(&mut self.step_requested)
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStats {
    pub ticks: u64,
    pub avg_fps: f32,
}

/// When a run stops and how fast it goes
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub max_ticks: Option<u64>,
    /// Minimum wall time per tick. `None` runs as fast as the presenter allows.
    pub frame_period: Option<Duration>,
}

/// Run until an input source requests quit or `max_ticks` ticks have run
pub fn run<P: Presenter>(
    game: &mut Game,
    presenter: &mut P,
    inputs: &mut [&mut dyn InputSource],
    options: RunOptions,
) -> Result<RunStats> {
    let mut control = ControlState::default();
    let mut fps = FpsCounter::new(60);
    let mut pacer = options.frame_period.map(FramePacer::new);
    let mut ticks = 0u64;

    loop {
        for input in inputs.iter_mut() {
            input.poll(&mut control);
        }
        if control.quit_requested() {
            info!("quit requested after {} ticks", ticks);
            break;
        }
        if options.max_ticks.is_some_and(|max| ticks >= max) {
            break;
        }

        game.tick(&mut control, presenter)?;
        if let Some(pacer) = &mut pacer {
            pacer.wait();
        }
        fps.tick();
        ticks += 1;
    }

    Ok(RunStats {
        ticks,
        avg_fps: fps.avg_fps(),
    })
}
