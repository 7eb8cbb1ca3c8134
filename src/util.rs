//! Shared utilities

use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};

// ============================================================================
// FPS Counter
// ============================================================================

/// Frame rate over a rolling window of recent frames
pub struct FpsCounter {
    frame_times: VecDeque<f32>,
    last_frame: Instant,
    sample_count: usize,
}

impl FpsCounter {
    /// Create a new FPS counter averaging over `sample_count` frames
    pub fn new(sample_count: usize) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(sample_count),
            last_frame: Instant::now(),
            sample_count: sample_count.max(1),
        }
    }

    /// Call once per frame. Returns the time since the previous call in seconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.record(dt);
        dt
    }

    fn record(&mut self, dt: f32) {
        self.frame_times.push_back(dt);
        if self.frame_times.len() > self.sample_count {
            self.frame_times.pop_front();
        }
    }

    /// Average frames per second over the window, 0 before any frame
    pub fn avg_fps(&self) -> f32 {
        let avg_dt = self.avg_frame_time();
        if avg_dt > 0.0 {
            1.0 / avg_dt
        } else {
            0.0
        }
    }

    /// Average frame time in seconds
    fn avg_frame_time(&self) -> f32 {
        self.frame_times.iter().sum::<f32>() / self.frame_times.len().max(1) as f32
    }

    /// Get the average frame time in milliseconds
    pub fn avg_frame_time_ms(&self) -> f32 {
        self.avg_frame_time() * 1000.0
    }
}

// ============================================================================
// Frame Pacer
// ============================================================================

/// Sleeps so that frames start no more often than once per period
pub struct FramePacer {
    period: Duration,
    next_frame: Instant,
}

impl FramePacer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_frame: Instant::now() + period,
        }
    }

    /// Block until the next frame is due. A late frame resets the schedule
    /// instead of bursting to catch up.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if self.next_frame > now {
            thread::sleep(self.next_frame - now);
            self.next_frame += self.period;
        } else {
            self.next_frame = now + self.period;
        }
    }
}
