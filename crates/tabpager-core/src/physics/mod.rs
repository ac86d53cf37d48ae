//! Geometry and physics kernel
//!
//! Pure kinematics for scroll motion plus the timer that drives them.
//! Every timing type exposes `value(t)` in closed form so an animation can
//! be sampled, paused, or seeked at any time without integrating state.
//!
//! - [`DecelerationTiming`] - exponential velocity decay after a fling
//! - [`SpringTiming`] - damped spring settling a displacement to rest
//! - [`RubberBand`] - elastic resistance outside the scroll bounds
//! - [`TimerAnimation`] - cancellable, time-driven animation driver
//!
//! # Example
//!
//! ```
//! use tabpager_core::physics::{DecelerationTiming, Spring, SpringTiming};
//!
//! let decay = DecelerationTiming::new(0.0, 1000.0, 0.998, 0.5);
//! assert!(decay.destination() > 400.0);
//!
//! let spring = SpringTiming::new(Spring::default(), 40.0, 0.0, 0.25);
//! assert!(spring.value(spring.duration()).abs() < 0.25);
//! ```

pub mod animation;
pub mod decay;
pub mod rubber_band;
pub mod spring;

pub use animation::{lerp, AnimationFrame, TimerAnimation};
pub use decay::DecelerationTiming;
pub use rubber_band::RubberBand;
pub use spring::{Spring, SpringTiming};

/// Closed interval a scroll offset may rest in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OffsetBounds {
    /// Smallest resting offset
    pub min: f64,
    /// Largest resting offset
    pub max: f64,
}

impl OffsetBounds {
    /// Creates bounds, widening `max` up to `min` if it is smaller
    pub fn new(min: f64, max: f64) -> Self {
        OffsetBounds {
            min,
            max: max.max(min),
        }
    }

    /// True if `offset` lies inside the bounds, borders included
    pub fn contains(&self, offset: f64) -> bool {
        offset >= self.min && offset <= self.max
    }

    /// Nearest resting offset for `offset`
    pub fn clamp(&self, offset: f64) -> f64 {
        offset.clamp(self.min, self.max)
    }

    /// The bound crossed when travelling from `from` to `to`, if any.
    ///
    /// `from` is expected to be inside the bounds.
    pub fn crossing(&self, from: f64, to: f64) -> Option<f64> {
        if !self.contains(from) {
            return None;
        }
        if to < self.min {
            Some(self.min)
        } else if to > self.max {
            Some(self.max)
        } else {
            None
        }
    }
}
