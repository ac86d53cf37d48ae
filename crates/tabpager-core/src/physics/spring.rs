//! Damped spring used to settle an overscrolled offset.
//!
//! The spring describes displacement from its rest position. Under-,
//! critically and over-damped regimes all have closed-form solutions, so
//! [`SpringTiming::value`] can be sampled at any time.

use serde::{Deserialize, Serialize};

/// Physical spring description.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    pub mass: f64,
    pub stiffness: f64,
    /// 1.0 is critical damping; below oscillates, above creeps.
    pub damping_ratio: f64,
}

impl Default for Spring {
    fn default() -> Self {
        Spring {
            mass: 1.0,
            stiffness: 100.0,
            damping_ratio: 1.0,
        }
    }
}

impl Spring {
    /// Damping coefficient `c = 2ζ·√(k·m)`
    pub fn damping(&self) -> f64 {
        2.0 * self.damping_ratio * (self.mass * self.stiffness).sqrt()
    }

    /// Exponential decay rate `β = c / 2m`
    pub fn beta(&self) -> f64 {
        self.damping() / (2.0 * self.mass)
    }

    /// Undamped natural frequency `ω₀ = √(k/m)`
    pub fn natural_frequency(&self) -> f64 {
        (self.stiffness / self.mass).sqrt()
    }

    /// Oscillation frequency of an underdamped spring
    pub fn damped_natural_frequency(&self) -> f64 {
        self.natural_frequency() * (1.0 - self.damping_ratio * self.damping_ratio).max(0.0).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Regime {
    Under { c1: f64, c2: f64, omega: f64 },
    Critical { c1: f64, c2: f64 },
    Over { a: f64, b: f64, r1: f64, r2: f64 },
}

/// Timing of a spring released with a displacement and a velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringTiming {
    spring: Spring,
    displacement: f64,
    initial_velocity: f64,
    threshold: f64,
    regime: Regime,
    duration: f64,
}

impl SpringTiming {
    /// Creates spring timing parameters.
    ///
    /// # Arguments
    ///
    /// * `spring` - Spring constants
    /// * `displacement` - Starting distance from rest
    /// * `initial_velocity` - Starting velocity in units per second
    /// * `threshold` - Displacement treated as settled
    pub fn new(spring: Spring, displacement: f64, initial_velocity: f64, threshold: f64) -> Self {
        let beta = spring.beta();
        let ratio = spring.damping_ratio;

        let regime = if (ratio - 1.0).abs() < f64::EPSILON {
            Regime::Critical {
                c1: displacement,
                c2: initial_velocity + beta * displacement,
            }
        } else if ratio < 1.0 {
            let omega = spring.damped_natural_frequency();
            Regime::Under {
                c1: displacement,
                c2: (initial_velocity + beta * displacement) / omega,
                omega,
            }
        } else {
            let root = (beta * beta - spring.natural_frequency().powi(2)).sqrt();
            let r1 = -beta + root;
            let r2 = -beta - root;
            let a = (initial_velocity - r2 * displacement) / (r1 - r2);
            Regime::Over {
                a,
                b: displacement - a,
                r1,
                r2,
            }
        };

        let duration = settle_time(regime, beta, threshold);

        SpringTiming {
            spring,
            displacement,
            initial_velocity,
            threshold,
            regime,
            duration,
        }
    }

    pub fn spring(&self) -> Spring {
        self.spring
    }

    pub fn displacement(&self) -> f64 {
        self.displacement
    }

    pub fn initial_velocity(&self) -> f64 {
        self.initial_velocity
    }

    /// Time until the displacement stays below the threshold.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Displacement from rest at time `t` seconds.
    pub fn value(&self, t: f64) -> f64 {
        let beta = self.spring.beta();
        match self.regime {
            Regime::Under { c1, c2, omega } => {
                (-beta * t).exp() * (c1 * (omega * t).cos() + c2 * (omega * t).sin())
            }
            Regime::Critical { c1, c2 } => (-beta * t).exp() * (c1 + c2 * t),
            Regime::Over { a, b, r1, r2 } => a * (r1 * t).exp() + b * (r2 * t).exp(),
        }
    }
}

fn settle_time(regime: Regime, beta: f64, threshold: f64) -> f64 {
    if threshold <= 0.0 || beta <= 0.0 {
        return 0.0;
    }
    let t = match regime {
        Regime::Under { c1, c2, .. } => {
            let amplitude = c1.abs() + c2.abs();
            if amplitude == 0.0 {
                0.0
            } else {
                (amplitude / threshold).ln() / beta
            }
        }
        Regime::Critical { c1, c2 } => {
            let t1 = if c1 == 0.0 {
                0.0
            } else {
                (2.0 * c1.abs() / threshold).ln() / beta
            };
            let t2 = if c2 == 0.0 {
                0.0
            } else {
                2.0 / beta * (4.0 * c2.abs() / (std::f64::consts::E * beta * threshold)).ln()
            };
            t1.max(t2)
        }
        Regime::Over { a, b, r1, .. } => {
            let amplitude = a.abs() + b.abs();
            if amplitude == 0.0 || r1 >= 0.0 {
                0.0
            } else {
                (amplitude / threshold).ln() / -r1
            }
        }
    };
    t.max(0.0)
}
