//! Presenter without a window
//!
//! Keeps a frame count and the checksum of the last frame. Used for
//! `--headless` runs and for checking that runs are reproducible.

use super::{PixelBuffer, Presenter};
use crate::error::Result;

#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    frames: u64,
    last_checksum: Option<u64>,
}

impl HeadlessPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// FNV-1a checksum of the most recent frame
    pub fn last_checksum(&self) -> Option<u64> {
        self.last_checksum
    }
}

impl Presenter for HeadlessPresenter {
    fn present(&mut self, buffer: &PixelBuffer) -> Result<()> {
        self.frames += 1;
        self.last_checksum = Some(buffer.checksum());
        Ok(())
    }
}
