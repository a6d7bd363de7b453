//! Wall-clock driven frame stepping shared by map tiles and sprites.

use crate::tileset::AnimationFrame;
use log::error;

/// Playback state for one animation.
///
/// Advances at most one frame per query, whenever the current frame has been up for its
/// full duration. The state only depends on the timestamps it is fed, not on how often
/// it is queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animator {
    current: usize,
    last_advance_ms: u64,
}

impl Animator {
    /// Starts on the first frame at `now_ms`.
    pub fn new(now_ms: u64) -> Self {
        Self {
            current: 0,
            last_advance_ms: now_ms,
        }
    }

    /// Index of the frame currently shown.
    #[inline]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Local tile id to show at `now_ms`.
    ///
    /// A zero-duration frame is a content bug: it is logged and local id 0 is returned.
    pub fn frame(&mut self, frames: &[AnimationFrame], now_ms: u64) -> u32 {
        if frames.is_empty() {
            return 0;
        }
        if self.current >= frames.len() {
            self.current = 0;
        }

        let duration = frames[self.current].duration_ms;
        if duration == 0 {
            error!("Animation frame {} has a duration of 0", self.current);
            return 0;
        }

        if now_ms.saturating_sub(self.last_advance_ms) >= u64::from(duration) {
            self.current = (self.current + 1) % frames.len();
            self.last_advance_ms = now_ms;
        }
        frames[self.current].tile_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames() -> Vec<AnimationFrame> {
        vec![
            AnimationFrame::new(10, 100),
            AnimationFrame::new(11, 50),
            AnimationFrame::new(12, 100),
        ]
    }

    #[test]
    fn steps_through_frames_and_wraps() {
        let frames = frames();
        let mut anim = Animator::new(0);
        assert_eq!(anim.frame(&frames, 0), 10);
        assert_eq!(anim.frame(&frames, 99), 10);
        assert_eq!(anim.frame(&frames, 100), 11);
        assert_eq!(anim.frame(&frames, 149), 11);
        assert_eq!(anim.frame(&frames, 150), 12);
        assert_eq!(anim.frame(&frames, 250), 10);
        assert_eq!(anim.current_index(), 0);
    }

    #[test]
    fn replaying_the_same_timestamps_gives_the_same_ids() {
        let frames = frames();
        let times = [0u64, 16, 120, 121, 180, 400, 401, 900, 905, 1000];
        let run = || {
            let mut anim = Animator::new(0);
            times.iter().map(|&t| anim.frame(&frames, t)).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn long_gaps_advance_one_frame_per_query() {
        let frames = frames();
        let mut anim = Animator::new(0);
        assert_eq!(anim.frame(&frames, 10_000), 11);
        assert_eq!(anim.frame(&frames, 10_000), 11);
    }

    #[test]
    fn zero_duration_frame_yields_tile_zero() {
        let frames = [AnimationFrame::new(7, 0)];
        let mut anim = Animator::new(0);
        assert_eq!(anim.frame(&frames, 500), 0);
        assert_eq!(anim.frame(&[], 500), 0);
    }
}
