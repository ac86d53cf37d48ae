//! Exponential deceleration after a fling.
//!
//! Velocity decays by `rate` every millisecond, so after `t` seconds it is
//! `v0 · rate^(1000t)`. Integrating gives the closed-form position used by
//! [`DecelerationTiming::value`].

/// Deceleration rate used by platform scroll views for normal scrolling.
pub const NORMAL_DECELERATION_RATE: f64 = 0.998;

/// Timing parameters for a decelerating scroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecelerationTiming {
    initial_value: f64,
    initial_velocity: f64,
    deceleration_rate: f64,
    threshold: f64,
    coefficient: f64,
}

impl DecelerationTiming {
    /// Creates deceleration parameters.
    ///
    /// # Arguments
    ///
    /// * `initial_value` - Offset when the finger lifted
    /// * `initial_velocity` - Velocity in units per second
    /// * `deceleration_rate` - Per-millisecond velocity factor in (0, 1)
    /// * `threshold` - Remaining distance treated as "arrived"
    pub fn new(
        initial_value: f64,
        initial_velocity: f64,
        deceleration_rate: f64,
        threshold: f64,
    ) -> Self {
        DecelerationTiming {
            initial_value,
            initial_velocity,
            deceleration_rate,
            threshold,
            coefficient: 1000.0 * deceleration_rate.ln(),
        }
    }

    pub fn initial_value(&self) -> f64 {
        self.initial_value
    }

    pub fn initial_velocity(&self) -> f64 {
        self.initial_velocity
    }

    pub fn deceleration_rate(&self) -> f64 {
        self.deceleration_rate
    }

    /// Where the motion comes to rest.
    pub fn destination(&self) -> f64 {
        if self.coefficient == 0.0 {
            return self.initial_value;
        }
        self.initial_value - self.initial_velocity / self.coefficient
    }

    /// Time until the remaining distance drops below the threshold.
    pub fn duration(&self) -> f64 {
        let speed = self.initial_velocity.abs();
        if speed == 0.0 || self.coefficient == 0.0 {
            return 0.0;
        }
        ((-self.coefficient * self.threshold / speed).ln() / self.coefficient).max(0.0)
    }

    /// Offset at time `t` seconds.
    pub fn value(&self, t: f64) -> f64 {
        if self.coefficient == 0.0 {
            return self.initial_value;
        }
        let decay = self.deceleration_rate.powf(1000.0 * t);
        self.initial_value + (decay - 1.0) / self.coefficient * self.initial_velocity
    }

    /// Velocity at time `t` seconds.
    pub fn velocity(&self, t: f64) -> f64 {
        self.initial_velocity * self.deceleration_rate.powf(1000.0 * t)
    }

    /// Time at which the motion passes `value`.
    ///
    /// Returns `None` when `value` does not lie between the initial value
    /// and the destination.
    pub fn duration_to(&self, value: f64) -> Option<f64> {
        let destination = self.destination();
        let (low, high) = if self.initial_value <= destination {
            (self.initial_value, destination)
        } else {
            (destination, self.initial_value)
        };
        if value < low || value > high {
            return None;
        }

        let speed = self.initial_velocity.abs();
        if speed == 0.0 {
            return Some(0.0);
        }
        let distance = (value - self.initial_value).abs();
        let remaining = 1.0 + self.coefficient * distance / speed;
        if remaining <= 0.0 {
            return None;
        }
        Some(remaining.ln() / self.coefficient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fling(velocity: f64) -> DecelerationTiming {
        DecelerationTiming::new(100.0, velocity, NORMAL_DECELERATION_RATE, 0.5)
    }

    #[test]
    fn test_zero_velocity_rests_in_place() {
        let timing = fling(0.0);
        assert_eq!(timing.destination(), 100.0);
        assert_eq!(timing.duration(), 0.0);
        assert_eq!(timing.value(0.3), 100.0);
    }

    #[test]
    fn test_destination_follows_velocity_sign() {
        assert!(fling(800.0).destination() > 100.0);
        assert!(fling(-800.0).destination() < 100.0);
    }

    #[test]
    fn test_value_starts_at_initial_and_approaches_destination() {
        let timing = fling(1200.0);
        assert!((timing.value(0.0) - 100.0).abs() < 1e-9);
        let end = timing.value(timing.duration());
        assert!((timing.destination() - end).abs() <= 0.5 + 1e-6);
    }

    #[test]
    fn test_velocity_decays() {
        let timing = fling(1000.0);
        assert!((timing.velocity(0.0) - 1000.0).abs() < 1e-9);
        assert!(timing.velocity(0.5) < timing.velocity(0.1));
        assert!(timing.velocity(0.5) > 0.0);
    }

    #[test]
    fn test_duration_to_reaches_value() {
        let timing = fling(1000.0);
        let target = 300.0;
        let t = timing.duration_to(target).expect("target is on the path");
        assert!((timing.value(t) - target).abs() < 1e-6);
    }

    #[test]
    fn test_duration_to_outside_path() {
        let timing = fling(1000.0);
        assert!(timing.duration_to(50.0).is_none());
        assert!(timing.duration_to(timing.destination() + 10.0).is_none());
    }

    #[test]
    fn test_duration_to_negative_direction() {
        let timing = fling(-1000.0);
        let t = timing.duration_to(0.0).expect("0 is on the path");
        assert!(timing.value(t).abs() < 1e-6);
    }
}
