//! Sprite animations advanced by the simulation tick
//!
//! Animation progress is plain state owned by the animated entity, so a
//! destroyed block or a paddle that changed type simply stops being stepped.

use serde::{Deserialize, Serialize};

/// How an animation behaves once it reaches its last frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Playback {
    /// Stop after the final frame and fall back to frame 0
    Once,
    /// Wrap around forever
    Loop,
}

/// Frame counter stepped once per tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameAnimation {
    pub frames: u8,
    pub step_ticks: u32,
    pub playback: Playback,
    /// Frame to draw (0 = resting sprite)
    pub frame: u8,
    elapsed: u32,
    running: bool,
}

impl FrameAnimation {
    pub fn new(frames: u8, step_ticks: u32, playback: Playback) -> Self {
        Self {
            frames: frames.max(1),
            step_ticks: step_ticks.max(1),
            playback,
            frame: 0,
            elapsed: 0,
            running: false,
        }
    }

    /// Restart from the first animated frame
    pub fn start(&mut self) {
        self.elapsed = 0;
        self.frame = if self.frames > 1 { 1 } else { 0 };
        self.running = true;
    }

    /// Halt and show the resting sprite
    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed = 0;
        self.frame = 0;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Total ticks for one pass through all frames
    pub fn duration_ticks(&self) -> u32 {
        self.frames as u32 * self.step_ticks
    }

    /// Fraction of one pass completed, in 0..=1
    pub fn progress(&self) -> f32 {
        (self.elapsed as f32 / self.duration_ticks() as f32).min(1.0)
    }

    /// Advance by one tick. Returns true on the tick a `Once` animation ends.
    pub fn advance(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed += 1;
        let step = self.elapsed / self.step_ticks;
        match self.playback {
            Playback::Loop => {
                self.frame = (step % self.frames as u32) as u8;
                false
            }
            Playback::Once => {
                if step >= self.frames as u32 {
                    self.stop();
                    true
                } else {
                    self.frame = ((step + 1) % self.frames as u32) as u8;
                    false
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_once_plays_every_frame_then_stops() {
        let mut anim = FrameAnimation::new(3, 2, Playback::Once);
        anim.start();
        let mut seen = vec![anim.frame];
        let mut finished_at = None;
        for t in 1..=10 {
            if anim.advance() {
                finished_at = Some(t);
                break;
            }
            seen.push(anim.frame);
        }
        assert_eq!(finished_at, Some(6));
        assert_eq!(seen, vec![1, 1, 2, 2, 0, 0]);
        assert!(!anim.is_running());
        assert_eq!(anim.frame, 0);
    }

    #[test]
    fn test_loop_wraps() {
        let mut anim = FrameAnimation::new(2, 1, Playback::Loop);
        anim.start();
        let frames: Vec<u8> = (0..4)
            .map(|_| {
                anim.advance();
                anim.frame
            })
            .collect();
        assert_eq!(frames, vec![1, 0, 1, 0]);
    }

    #[test]
    fn test_idle_does_not_advance() {
        let mut anim = FrameAnimation::new(4, 1, Playback::Once);
        assert!(!anim.advance());
        assert_eq!(anim.frame, 0);
    }
}
