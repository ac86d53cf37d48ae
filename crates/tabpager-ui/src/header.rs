//! Collapsible-header gesture coordinator
//!
//! A vertical drag on the container moves one *virtual* offset. The first
//! `header_height` units of it collapse the header; anything beyond scrolls
//! the selected page's own content. Releasing the drag continues the motion
//! with exponential deceleration, and a spring settles any overscroll back
//! inside the bounds.
//!
//! The coordinator owns only the motion state. The offsets themselves live
//! behind [`VirtualScroll`] so the same gesture logic drives the real
//! header/page split and simple test doubles.

use std::time::Instant;

use tabpager_core::physics::{
    DecelerationTiming, OffsetBounds, RubberBand, SpringTiming, TimerAnimation,
};
use tabpager_core::{GesturePhase, GestureSignal, InnerScroll, PhysicsConfig};
use tracing::{debug, trace};

/// One scroll offset driven by the coordinator.
pub trait VirtualScroll {
    fn virtual_offset(&self) -> f64;

    fn set_virtual_offset(&mut self, offset: f64);

    /// Resting range, measured fresh on every call
    fn bounds(&self) -> OffsetBounds;

    /// Visible extent along the scroll axis, the rubber band's limit
    fn viewport_extent(&self) -> f64;
}

/// Vertical measurements of the container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeaderMetrics {
    pub header_height: f64,
    /// Strip, separator and their gaps
    pub chrome_height: f64,
    /// Height of the whole container
    pub viewport_height: f64,
}

impl HeaderMetrics {
    /// Height left for the pages below the chrome.
    pub fn pager_height(&self) -> f64 {
        (self.viewport_height - self.chrome_height).max(0.0)
    }

    /// Virtual offset range for a page whose content is `inner_content`
    /// tall, or exactly one page tall when it has no scroll content.
    pub fn bounds(&self, inner_content: Option<f64>) -> OffsetBounds {
        let content = inner_content.unwrap_or_else(|| self.pager_height());
        let max = self.header_height + self.chrome_height + content - self.viewport_height;
        OffsetBounds::new(0.0, max.max(0.0))
    }
}

/// The header offset and the selected page's inner scroll seen as one offset.
pub struct SplitScroll<'a> {
    pub header_offset: &'a mut f64,
    pub inner: Option<&'a mut dyn InnerScroll>,
    pub metrics: HeaderMetrics,
}

impl VirtualScroll for SplitScroll<'_> {
    fn virtual_offset(&self) -> f64 {
        match self.inner.as_deref() {
            Some(inner) if inner.offset() > 0.0 => inner.offset() + self.metrics.header_height,
            _ => *self.header_offset,
        }
    }

    fn set_virtual_offset(&mut self, offset: f64) {
        let header_height = self.metrics.header_height;
        if offset > header_height {
            *self.header_offset = header_height;
            if let Some(inner) = self.inner.as_deref_mut() {
                inner.set_offset(offset - header_height);
            }
        } else {
            if let Some(inner) = self.inner.as_deref_mut() {
                inner.set_offset(0.0);
            }
            *self.header_offset = offset;
        }
    }

    fn bounds(&self) -> OffsetBounds {
        let inner_content = self.inner.as_deref().map(|inner| inner.content_height());
        self.metrics.bounds(inner_content)
    }

    fn viewport_extent(&self) -> f64 {
        self.metrics.viewport_height
    }
}

/// Kind of motion running after a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Deceleration,
    Bounce,
}

#[derive(Debug, Clone, Copy)]
enum Motion {
    Deceleration {
        timing: DecelerationTiming,
        /// Bound the motion is cut at, handed to a bounce on finish
        crossing: Option<f64>,
    },
    Bounce {
        timing: SpringTiming,
        rest: f64,
    },
}

/// A running release animation.
#[derive(Debug, Clone)]
pub struct OffsetAnimation {
    motion: Motion,
    timer: TimerAnimation,
}

impl OffsetAnimation {
    pub fn kind(&self) -> MotionKind {
        match self.motion {
            Motion::Deceleration { .. } => MotionKind::Deceleration,
            Motion::Bounce { .. } => MotionKind::Bounce,
        }
    }

    /// Where the motion comes to rest if it runs to completion.
    pub fn destination(&self) -> f64 {
        match self.motion {
            Motion::Deceleration { timing, .. } => timing.destination(),
            Motion::Bounce { rest, .. } => rest,
        }
    }

    pub fn duration(&self) -> f64 {
        self.timer.duration().as_secs_f64()
    }
}

/// Coordinator state; exactly one holds at a time.
#[derive(Debug, Clone, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging {
        initial_offset: f64,
    },
    Animating(OffsetAnimation),
}

/// Drives the virtual offset from drag gestures and release physics.
#[derive(Debug, Clone)]
pub struct GestureCoordinator {
    state: GestureState,
    last_event: Option<Instant>,
    physics: PhysicsConfig,
}

impl Default for GestureCoordinator {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl GestureCoordinator {
    pub fn new(physics: PhysicsConfig) -> Self {
        GestureCoordinator {
            state: GestureState::Idle,
            last_event: None,
            physics,
        }
    }

    pub fn set_physics(&mut self, physics: PhysicsConfig) {
        self.physics = physics;
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, GestureState::Animating(_))
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    /// Applies one drag update to `scroll`.
    pub fn handle_gesture<S>(&mut self, signal: &GestureSignal, scroll: &mut S)
    where
        S: VirtualScroll + ?Sized,
    {
        match signal.phase {
            GesturePhase::Began => {
                self.stop_animation();
                let initial_offset = scroll.virtual_offset();
                debug!(initial_offset, "header drag began");
                self.state = GestureState::Dragging { initial_offset };
            }
            GesturePhase::Changed => {
                if let GestureState::Dragging { initial_offset } = self.state {
                    let band = RubberBand::new(scroll.viewport_extent(), scroll.bounds())
                        .with_coefficient(self.physics.rubber_band_coefficient);
                    let offset = band.clamp(initial_offset - signal.translation);
                    trace!(offset, "header drag");
                    scroll.set_virtual_offset(offset);
                }
            }
            GesturePhase::Ended => {
                if self.is_dragging() {
                    self.state = GestureState::Idle;
                    // a release long after the last move carries no velocity
                    let stopped = self.last_event.is_some_and(|previous| {
                        signal.timestamp.saturating_duration_since(previous)
                            >= self.physics.velocity_window()
                    });
                    let velocity = if stopped { 0.0 } else { signal.velocity };
                    debug!(velocity, stopped, "header drag ended");
                    self.complete_gesture(-velocity, scroll);
                } else {
                    debug!("header drag ended without a drag in progress");
                }
            }
            GesturePhase::Cancelled => {
                debug!("header drag cancelled");
                self.state = GestureState::Idle;
            }
        }
        self.last_event = Some(signal.timestamp);
    }

    /// A new touch landed; any release animation stops where it is.
    pub fn touch_began(&mut self) {
        self.stop_animation();
    }

    /// Cancels a running animation without moving the offset.
    pub fn stop_animation(&mut self) {
        if let GestureState::Animating(animation) = &mut self.state {
            animation.timer.cancel();
            debug!(kind = ?animation.kind(), "header animation stopped");
            self.state = GestureState::Idle;
        }
    }

    /// Advances a running animation to `now`.
    ///
    /// Returns true while an animation is still running.
    pub fn tick<S>(&mut self, now: Instant, scroll: &mut S) -> bool
    where
        S: VirtualScroll + ?Sized,
    {
        let GestureState::Animating(animation) = &mut self.state else {
            return false;
        };
        let Some(frame) = animation.timer.tick(now) else {
            self.state = GestureState::Idle;
            return false;
        };
        let motion = animation.motion;

        match motion {
            Motion::Deceleration { timing, crossing } => {
                let offset = match crossing {
                    Some(bound) if frame.finished => bound,
                    _ => timing.value(frame.time),
                };
                scroll.set_virtual_offset(offset);
            }
            Motion::Bounce { timing, rest } => {
                let offset = if frame.finished {
                    rest
                } else {
                    rest + timing.value(frame.time)
                };
                scroll.set_virtual_offset(offset);
            }
        }
        trace!(time = frame.time, progress = frame.progress, "header animation");

        if !frame.finished {
            return true;
        }
        match motion {
            Motion::Deceleration {
                timing,
                crossing: Some(_),
            } => {
                self.bounce(timing.velocity(frame.time), scroll);
                true
            }
            _ => {
                self.state = GestureState::Idle;
                false
            }
        }
    }

    fn complete_gesture<S>(&mut self, velocity: f64, scroll: &mut S)
    where
        S: VirtualScroll + ?Sized,
    {
        if scroll.bounds().contains(scroll.virtual_offset()) {
            self.start_deceleration(velocity, scroll);
        } else {
            self.bounce(velocity, scroll);
        }
    }

    fn start_deceleration<S>(&mut self, velocity: f64, scroll: &mut S)
    where
        S: VirtualScroll + ?Sized,
    {
        let offset = scroll.virtual_offset();
        let timing = DecelerationTiming::new(
            offset,
            velocity,
            self.physics.deceleration_rate,
            self.physics.decay_threshold,
        );
        let crossing = scroll.bounds().crossing(offset, timing.destination());
        let duration = crossing
            .and_then(|bound| timing.duration_to(bound))
            .unwrap_or_else(|| timing.duration());

        debug!(
            offset,
            velocity,
            destination = timing.destination(),
            ?crossing,
            duration,
            "header deceleration"
        );
        self.state = GestureState::Animating(OffsetAnimation {
            motion: Motion::Deceleration { timing, crossing },
            timer: TimerAnimation::from_secs(duration),
        });
    }

    fn bounce<S>(&mut self, velocity: f64, scroll: &mut S)
    where
        S: VirtualScroll + ?Sized,
    {
        let offset = scroll.virtual_offset();
        let rest = scroll.bounds().clamp(offset);
        let timing = SpringTiming::new(
            self.physics.spring,
            offset - rest,
            velocity,
            self.physics.spring_threshold,
        );
        debug!(offset, rest, velocity, duration = timing.duration(), "header bounce");
        self.state = GestureState::Animating(OffsetAnimation {
            motion: Motion::Bounce { timing, rest },
            timer: TimerAnimation::from_secs(timing.duration()),
        });
    }
}
