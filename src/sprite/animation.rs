//! Frame-based sprite animation
//!
//! Time is counted in ticks. Frame `i` is shown for ticks
//! `[i * frame_duration, (i + 1) * frame_duration)`. When the last frame
//! runs out the animation either wraps to frame 0 or terminates.

use std::rc::Rc;

use super::Sprite;
use crate::error::{Error, Result};

/// Lifecycle of an animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    /// Still has a current frame
    Active,
    /// A non-looping animation ran past its last frame
    Terminated,
}

/// A timed sequence of shared sprite frames
#[derive(Debug, Clone)]
pub struct SpriteAnimation {
    frames: Vec<Rc<Sprite>>,
    frame_duration: u32,
    looping: bool,
    elapsed: u32,
    state: AnimationState,
}

impl SpriteAnimation {
    pub fn new(frames: Vec<Rc<Sprite>>, frame_duration: u32, looping: bool) -> Result<Self> {
        if frames.is_empty() {
            return Err(Error::EmptyAnimation);
        }
        if frame_duration == 0 {
            return Err(Error::ZeroFrameDuration);
        }
        // Total duration must fit the tick counter
        if (frames.len() as u64) * (frame_duration as u64) > u32::MAX as u64 {
            return Err(Error::AnimationTooLong {
                frames: frames.len(),
                frame_duration,
            });
        }
        Ok(Self {
            frames,
            frame_duration,
            looping,
            elapsed: 0,
            state: AnimationState::Active,
        })
    }

    /// Total length of one pass through every frame, in ticks
    #[inline]
    pub fn total_duration(&self) -> u32 {
        self.frames.len() as u32 * self.frame_duration
    }

    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn frame_duration(&self) -> u32 {
        self.frame_duration
    }

    #[inline]
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    #[inline]
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    #[inline]
    pub fn state(&self) -> AnimationState {
        self.state
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == AnimationState::Active
    }

    /// Index of the frame on screen this tick
    #[inline]
    pub fn frame_index(&self) -> usize {
        (self.elapsed / self.frame_duration) as usize
    }

    /// Current frame, or None once terminated
    pub fn try_current_frame(&self) -> Option<&Rc<Sprite>> {
        if self.is_active() {
            Some(&self.frames[self.frame_index()])
        } else {
            None
        }
    }

    /// Current frame.
    ///
    /// # Panics
    /// Panics if the animation has terminated. Callers drop finished
    /// animations instead of querying them.
    pub fn current_frame(&self) -> &Rc<Sprite> {
        assert!(
            self.is_active(),
            "current_frame queried on a terminated animation"
        );
        &self.frames[self.frame_index()]
    }

    /// Advance by one tick and report the resulting state
    pub fn advance(&mut self) -> AnimationState {
        if self.state == AnimationState::Terminated {
            return self.state;
        }
        self.elapsed += 1;
        if self.elapsed == self.total_duration() {
            if self.looping {
                self.elapsed = 0;
            } else {
                self.state = AnimationState::Terminated;
            }
        }
        self.state
    }

    /// Rewind to frame 0 and reactivate
    pub fn restart(&mut self) {
        self.elapsed = 0;
        self.state = AnimationState::Active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(n: usize) -> Vec<Rc<Sprite>> {
        (0..n)
            .map(|i| {
                let mut stencil = vec![0; n];
                stencil[i] = 1;
                Rc::new(Sprite::new(n as u32, 1, stencil).unwrap())
            })
            .collect()
    }

    #[test]
    fn test_rejects_empty_and_zero_duration() {
        assert!(matches!(
            SpriteAnimation::new(Vec::new(), 10, true),
            Err(Error::EmptyAnimation)
        ));
        assert!(matches!(
            SpriteAnimation::new(frames(2), 0, true),
            Err(Error::ZeroFrameDuration)
        ));
    }

    #[test]
    fn test_rejects_duration_past_tick_counter() {
        assert!(matches!(
            SpriteAnimation::new(frames(2), u32::MAX, true),
            Err(Error::AnimationTooLong {
                frames: 2,
                frame_duration: u32::MAX
            })
        ));
        // Exactly u32::MAX total ticks still fits
        assert!(SpriteAnimation::new(frames(1), u32::MAX, false).is_ok());
    }

    #[test]
    fn test_looping_frame_schedule() {
        let f = frames(2);
        let mut anim = SpriteAnimation::new(f.clone(), 10, true).unwrap();
        for tick in 0..60 {
            let expected = if tick % 20 < 10 { 0 } else { 1 };
            assert_eq!(anim.elapsed(), tick % 20);
            assert_eq!(anim.frame_index(), expected, "tick {tick}");
            assert!(Rc::ptr_eq(anim.current_frame(), &f[expected]));
            assert_eq!(anim.advance(), AnimationState::Active);
        }
    }

    #[test]
    fn test_looping_wraps_exactly_at_total() {
        let mut anim = SpriteAnimation::new(frames(2), 10, true).unwrap();
        for _ in 0..19 {
            anim.advance();
        }
        assert_eq!(anim.elapsed(), 19);
        assert_eq!(anim.frame_index(), 1);
        anim.advance();
        assert_eq!(anim.elapsed(), 0);
        assert_eq!(anim.frame_index(), 0);
    }

    #[test]
    fn test_non_looping_terminates_at_total() {
        let mut anim = SpriteAnimation::new(frames(2), 10, false).unwrap();
        for _ in 0..19 {
            assert_eq!(anim.advance(), AnimationState::Active);
        }
        assert_eq!(anim.frame_index(), 1);
        assert_eq!(anim.advance(), AnimationState::Terminated);
        assert!(anim.try_current_frame().is_none());
        // Further ticks stay terminated
        assert_eq!(anim.advance(), AnimationState::Terminated);
    }

    #[test]
    #[should_panic(expected = "terminated animation")]
    fn test_current_frame_on_terminated_panics() {
        let mut anim = SpriteAnimation::new(frames(1), 1, false).unwrap();
        anim.advance();
        let _ = anim.current_frame();
    }

    #[test]
    fn test_single_frame_single_tick_loop() {
        let mut anim = SpriteAnimation::new(frames(1), 1, true).unwrap();
        for _ in 0..5 {
            assert_eq!(anim.advance(), AnimationState::Active);
            assert_eq!(anim.elapsed(), 0);
        }
    }

    #[test]
    fn test_restart_reactivates() {
        let mut anim = SpriteAnimation::new(frames(2), 1, false).unwrap();
        anim.advance();
        anim.advance();
        assert!(!anim.is_active());
        anim.restart();
        assert!(anim.is_active());
        assert_eq!(anim.frame_index(), 0);
    }

    #[test]
    fn test_frames_shared_not_copied() {
        let f = frames(2);
        let anim = SpriteAnimation::new(f.clone(), 3, true).unwrap();
        assert_eq!(Rc::strong_count(&f[0]), 2);
        drop(anim);
        assert_eq!(Rc::strong_count(&f[0]), 1);
    }
}
