//! Time-driven animation driver.
//!
//! The terminal has no display-refresh callback, so animations are driven by
//! whoever owns the event loop calling [`TimerAnimation::tick`] with the
//! current instant. The start time is taken from the first tick.

use std::time::{Duration, Instant};

/// Linear interpolation between two values
///
/// # Arguments
/// * `from` - Start value
/// * `to` - End value
/// * `t` - Interpolation factor, usually in [0.0, 1.0]
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// One sample of a running animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    /// Seconds since the first tick, capped at the duration
    pub time: f64,
    /// `time / duration` in [0.0, 1.0]
    pub progress: f64,
    /// Set on the last frame only
    pub finished: bool,
}

/// Cancellable animation of fixed duration.
#[derive(Debug, Clone)]
pub struct TimerAnimation {
    duration: Duration,
    started_at: Option<Instant>,
    finished: bool,
    cancelled: bool,
}

impl TimerAnimation {
    pub fn new(duration: Duration) -> Self {
        TimerAnimation {
            duration,
            started_at: None,
            finished: false,
            cancelled: false,
        }
    }

    /// Animation lasting `seconds`; negative or non-finite values become zero.
    pub fn from_secs(seconds: f64) -> Self {
        let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        Self::new(Duration::from_secs_f64(seconds))
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Advances the animation to `now`.
    ///
    /// Returns `None` once the animation was cancelled or has already
    /// delivered its finishing frame.
    pub fn tick(&mut self, now: Instant) -> Option<AnimationFrame> {
        if self.cancelled || self.finished {
            return None;
        }
        let start = *self.started_at.get_or_insert(now);
        let elapsed = now.saturating_duration_since(start);

        if self.duration.is_zero() || elapsed >= self.duration {
            self.finished = true;
            return Some(AnimationFrame {
                time: self.duration.as_secs_f64(),
                progress: 1.0,
                finished: true,
            });
        }

        let time = elapsed.as_secs_f64();
        Some(AnimationFrame {
            time,
            progress: (time / self.duration.as_secs_f64()).clamp(0.0, 1.0),
            finished: false,
        })
    }

    /// Stops the animation; no further frames are produced.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// True while frames are still expected
    pub fn is_running(&self) -> bool {
        !self.cancelled && !self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.0) - 0.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 0.5) - 50.0).abs() < 0.001);
        assert!((lerp(40.0, 80.0, 1.0) - 80.0).abs() < 0.001);
    }

    #[test]
    fn test_first_tick_starts_clock() {
        let mut timer = TimerAnimation::from_secs(0.25);
        let start = Instant::now();
        let frame = timer.tick(start).expect("running");
        assert_eq!(frame.time, 0.0);
        assert_eq!(frame.progress, 0.0);
        assert!(!frame.finished);
    }

    #[test]
    fn test_progress_advances_and_finishes_once() {
        let mut timer = TimerAnimation::from_secs(1.0);
        let start = Instant::now();
        timer.tick(start);

        let half = timer.tick(start + Duration::from_millis(500)).expect("running");
        assert!((half.progress - 0.5).abs() < 1e-9);

        let last = timer.tick(start + Duration::from_millis(1500)).expect("last frame");
        assert!(last.finished);
        assert_eq!(last.progress, 1.0);
        assert_eq!(last.time, 1.0);
        assert!(timer.is_finished());

        assert!(timer.tick(start + Duration::from_secs(2)).is_none());
    }

    #[test]
    fn test_zero_duration_finishes_on_first_tick() {
        let mut timer = TimerAnimation::from_secs(0.0);
        let frame = timer.tick(Instant::now()).expect("finishing frame");
        assert!(frame.finished);
        assert_eq!(frame.progress, 1.0);
    }

    #[test]
    fn test_negative_duration_is_zero() {
        let timer = TimerAnimation::from_secs(-3.0);
        assert!(timer.duration().is_zero());
    }

    #[test]
    fn test_cancel_stops_frames() {
        let mut timer = TimerAnimation::from_secs(1.0);
        let start = Instant::now();
        timer.tick(start);
        timer.cancel();
        assert!(timer.is_cancelled());
        assert!(!timer.is_running());
        assert!(timer.tick(start + Duration::from_millis(100)).is_none());
    }
}
