//! Rubber-band resistance for offsets dragged past their bounds.

use super::OffsetBounds;

/// Resistance coefficient used by platform scroll views.
pub const DEFAULT_COEFFICIENT: f64 = 0.55;

/// Maps a raw offset to a resisted offset.
///
/// Inside the bounds the offset is returned unchanged. Past a bound the
/// excess `d` is shrunk to `(1 - 1 / (d·c / dim + 1)) · dim`, which grows
/// monotonically and never reaches `dim`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RubberBand {
    pub coefficient: f64,
    /// Viewport extent along the scrolling axis
    pub dimension: f64,
    pub bounds: OffsetBounds,
}

impl RubberBand {
    pub fn new(dimension: f64, bounds: OffsetBounds) -> Self {
        RubberBand {
            coefficient: DEFAULT_COEFFICIENT,
            dimension,
            bounds,
        }
    }

    pub fn with_coefficient(mut self, coefficient: f64) -> Self {
        self.coefficient = coefficient;
        self
    }

    /// Applies resistance to `offset`.
    pub fn clamp(&self, offset: f64) -> f64 {
        if offset < self.bounds.min {
            self.bounds.min - self.resist(self.bounds.min - offset)
        } else if offset > self.bounds.max {
            self.bounds.max + self.resist(offset - self.bounds.max)
        } else {
            offset
        }
    }

    fn resist(&self, excess: f64) -> f64 {
        if self.dimension <= 0.0 {
            return 0.0;
        }
        (1.0 - 1.0 / (excess * self.coefficient / self.dimension + 1.0)) * self.dimension
    }
}
