//! Event and message system for the tab page container
//!
//! This module provides the signals consumed by the synchronization engine
//! (scroll and gesture updates, appearance transitions) and the messages
//! exchanged between the container and its host.

use std::time::Instant;
use tokio::sync::broadcast;

use crate::error::CoreError;

/// Appearance transition forwarded to a content unit.
///
/// Every `Will*` phase is eventually followed by the matching `Did*` phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Appearance {
    /// The unit is about to become visible
    WillAppear,
    /// The unit finished becoming visible
    DidAppear,
    /// The unit is about to be hidden
    WillDisappear,
    /// The unit finished being hidden
    DidDisappear,
}

impl Appearance {
    /// Returns the `Will*` phase for an appearing or disappearing unit
    pub fn begin(appearing: bool) -> Self {
        if appearing {
            Appearance::WillAppear
        } else {
            Appearance::WillDisappear
        }
    }

    /// Returns the `Did*` phase that completes this transition
    ///
    /// # Example
    ///
    /// ```
    /// use tabpager_core::Appearance;
    ///
    /// assert_eq!(Appearance::WillAppear.completion(), Appearance::DidAppear);
    /// assert_eq!(Appearance::DidDisappear.completion(), Appearance::DidDisappear);
    /// ```
    pub fn completion(self) -> Self {
        match self {
            Appearance::WillAppear | Appearance::DidAppear => Appearance::DidAppear,
            Appearance::WillDisappear | Appearance::DidDisappear => Appearance::DidDisappear,
        }
    }

    /// Returns true for the two appearing phases
    pub fn is_appearing(self) -> bool {
        matches!(self, Appearance::WillAppear | Appearance::DidAppear)
    }

    /// Returns true for the two `Will*` phases
    pub fn is_begin(self) -> bool {
        matches!(self, Appearance::WillAppear | Appearance::WillDisappear)
    }
}

/// Horizontal paging position read on every scroll event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollSignal {
    /// Current content offset along the paging axis
    pub offset: f64,
    /// Width of one page (the visible viewport)
    pub viewport_width: f64,
    /// Width of all pages laid out edge-to-edge
    pub content_width: f64,
}

impl ScrollSignal {
    /// Creates a new scroll signal
    pub fn new(offset: f64, viewport_width: f64, content_width: f64) -> Self {
        ScrollSignal {
            offset,
            viewport_width,
            content_width,
        }
    }

    /// Distance the content can travel, never negative
    pub fn scroll_range(&self) -> f64 {
        (self.content_width - self.viewport_width).max(0.0)
    }
}

/// Phase of a pointer drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    /// Finger down and recognized as a drag
    Began,
    /// Drag moved
    Changed,
    /// Finger lifted
    Ended,
    /// Recognizer cancelled or failed
    Cancelled,
}

/// Pointer-drag update delivered by the host gesture recognizer.
///
/// `translation` is the displacement since the drag began; `velocity` is
/// the recognizer-reported velocity in units per second. Both follow the
/// finger, so dragging down yields positive values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSignal {
    /// Drag phase
    pub phase: GesturePhase,
    /// Displacement since the drag began
    pub translation: f64,
    /// Instantaneous velocity in units per second
    pub velocity: f64,
    /// When the recognizer produced this update
    pub timestamp: Instant,
}

impl GestureSignal {
    pub fn began(timestamp: Instant) -> Self {
        GestureSignal {
            phase: GesturePhase::Began,
            translation: 0.0,
            velocity: 0.0,
            timestamp,
        }
    }

    pub fn changed(translation: f64, timestamp: Instant) -> Self {
        GestureSignal {
            phase: GesturePhase::Changed,
            translation,
            velocity: 0.0,
            timestamp,
        }
    }

    pub fn ended(translation: f64, velocity: f64, timestamp: Instant) -> Self {
        GestureSignal {
            phase: GesturePhase::Ended,
            translation,
            velocity,
            timestamp,
        }
    }

    pub fn cancelled(timestamp: Instant) -> Self {
        GestureSignal {
            phase: GesturePhase::Cancelled,
            translation: 0.0,
            velocity: 0.0,
            timestamp,
        }
    }
}

/// Messages exchanged between the container and its host
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // === Navigation ===
    /// Select a tab programmatically
    SelectTab(usize),
    /// User tapped a tab title
    TapTab(usize),
    /// Select the tab after the current one
    NextTab,
    /// Select the tab before the current one
    PrevTab,

    // === Paging ===
    /// User started dragging the paged content
    PagingBegan,
    /// User moved the paged content to a new offset
    PagingScrolled(f64),
    /// Paging deceleration came to rest
    PagingSettled,

    // === Collapsible header ===
    /// A new touch landed on the container
    TouchBegan,
    /// Pointer-drag update for the header coordinator
    Gesture(GestureSignal),

    // === Notifications ===
    /// Selection moved between tabs
    SelectionChanged {
        /// Previously selected index
        from: Option<usize>,
        /// Newly selected index
        to: Option<usize>,
    },
    /// Tab cells whose selected styling must be refreshed
    TabsRefreshed(Vec<usize>),

    // === Global ===
    /// Quit the host application
    Quit,

    // === Batch ===
    /// Multiple messages to process in sequence
    Batch(Vec<Message>),
}

impl Message {
    /// Creates a batch of messages
    pub fn batch(messages: Vec<Message>) -> Self {
        Message::Batch(messages)
    }
}

/// Receiving end of a [`MessageBus`] subscription
pub type BusReceiver = broadcast::Receiver<Message>;

/// Message bus for broadcasting container notifications
///
/// The container publishes selection and refresh notifications here so
/// hosts can observe it without holding references into the container.
/// Uses tokio's broadcast channel; receivers can be polled with
/// `try_recv` from a synchronous UI loop.
///
/// # Example
///
/// ```
/// use tabpager_core::event::{Message, MessageBus};
///
/// let bus = MessageBus::new(16);
/// let mut rx = bus.subscribe();
/// bus.send(Message::TabsRefreshed(vec![0, 1])).expect("one subscriber");
/// assert_eq!(rx.try_recv().ok(), Some(Message::TabsRefreshed(vec![0, 1])));
/// ```
#[derive(Debug)]
pub struct MessageBus {
    sender: broadcast::Sender<Message>,
}

impl MessageBus {
    /// Creates a new message bus with the specified capacity
    ///
    /// Slow receivers lose the oldest messages once `capacity` is exceeded.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        MessageBus { sender }
    }

    /// Subscribe to receive messages sent after this call
    pub fn subscribe(&self) -> BusReceiver {
        self.sender.subscribe()
    }

    /// Send a message to all subscribers
    ///
    /// Returns the number of receivers that received the message.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EventError` if there are no active subscribers.
    pub fn send(&self, msg: Message) -> Result<usize, CoreError> {
        self.sender
            .send(msg)
            .map_err(|e| CoreError::EventError(format!("failed to send message: {}", e)))
    }

    /// Returns the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        MessageBus::new(256)
    }
}

impl Clone for MessageBus {
    fn clone(&self) -> Self {
        MessageBus {
            sender: self.sender.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_batch() {
        let msg = Message::batch(vec![Message::TapTab(1), Message::NextTab]);
        assert_eq!(
            msg,
            Message::Batch(vec![Message::TapTab(1), Message::NextTab])
        );
    }

    #[test]
    fn test_appearance_pairs() {
        assert_eq!(Appearance::begin(true), Appearance::WillAppear);
        assert_eq!(Appearance::begin(false), Appearance::WillDisappear);
        assert_eq!(
            Appearance::WillDisappear.completion(),
            Appearance::DidDisappear
        );
        assert!(Appearance::WillAppear.is_begin());
        assert!(!Appearance::DidAppear.is_begin());
        assert!(Appearance::DidAppear.is_appearing());
        assert!(!Appearance::WillDisappear.is_appearing());
    }

    #[test]
    fn test_scroll_signal_range_never_negative() {
        let signal = ScrollSignal::new(0.0, 320.0, 0.0);
        assert_eq!(signal.scroll_range(), 0.0);

        let signal = ScrollSignal::new(0.0, 320.0, 960.0);
        assert_eq!(signal.scroll_range(), 640.0);
    }

    #[test]
    fn test_gesture_constructors() {
        let now = Instant::now();
        assert_eq!(GestureSignal::began(now).phase, GesturePhase::Began);
        let changed = GestureSignal::changed(12.0, now);
        assert_eq!(changed.translation, 12.0);
        let ended = GestureSignal::ended(20.0, -300.0, now);
        assert_eq!(ended.phase, GesturePhase::Ended);
        assert_eq!(ended.velocity, -300.0);
        assert_eq!(GestureSignal::cancelled(now).phase, GesturePhase::Cancelled);
    }

    #[test]
    fn test_message_bus_new() {
        let bus = MessageBus::new(100);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_message_bus_send_no_subscribers() {
        let bus = MessageBus::new(100);
        assert!(bus.send(Message::Quit).is_err());
    }

    #[test]
    fn test_message_bus_clone_shares_channel() {
        let bus1 = MessageBus::new(100);
        let _rx = bus1.subscribe();
        let bus2 = bus1.clone();
        assert_eq!(bus2.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_message_bus_send_receive() {
        let bus = MessageBus::new(100);
        let mut rx = bus.subscribe();

        let count = bus
            .send(Message::SelectionChanged {
                from: Some(0),
                to: Some(2),
            })
            .expect("send should succeed");
        assert_eq!(count, 1);

        let received = rx.recv().await.expect("should receive message");
        assert_eq!(
            received,
            Message::SelectionChanged {
                from: Some(0),
                to: Some(2)
            }
        );
    }

    #[tokio::test]
    async fn test_message_bus_broadcast_to_multiple() {
        let bus = MessageBus::new(100);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let count = bus.send(Message::NextTab).expect("send should succeed");
        assert_eq!(count, 2);

        assert!(matches!(rx1.recv().await, Ok(Message::NextTab)));
        assert!(matches!(rx2.recv().await, Ok(Message::NextTab)));
    }
}
