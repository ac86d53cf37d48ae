//! Content unit and display model traits.
//!
//! A tab page container pairs each page's content (a [`ContentUnit`]) with
//! a display model (anything implementing [`TabModel`]) that provides the
//! title shown in the tab strip.

use crate::event::Appearance;
use ratatui::prelude::*;

/// Display model for a tab title.
///
/// Implemented for `String` and `&'static str` so plain titles can be used
/// directly.
pub trait TabModel {
    /// Returns the title shown in the tab strip.
    fn title(&self) -> &str;
}

impl TabModel for String {
    fn title(&self) -> &str {
        self
    }
}

impl TabModel for &'static str {
    fn title(&self) -> &str {
        self
    }
}

/// Vertical scroll content owned by a content unit.
///
/// The collapsible-header coordinator drives this directly while it merges
/// the header offset with the page's own scrolling.
pub trait InnerScroll {
    /// Current vertical offset
    fn offset(&self) -> f64;

    /// Moves the content to `offset`
    fn set_offset(&mut self, offset: f64);

    /// Total height of the scrollable content
    fn content_height(&self) -> f64;

    /// Enables or disables the unit's own scroll handling
    fn set_scroll_enabled(&mut self, enabled: bool);
}

/// One page of content hosted by the container.
///
/// Units are owned exclusively by the container while installed. They
/// receive attach/detach notifications when the item list changes and
/// paired appearance transitions when they become or stop being the
/// selected page.
///
/// # Thread Safety
///
/// Units are driven from the single UI thread, so there is no
/// `Send + Sync` requirement.
///
/// # Example
///
/// ```ignore
/// use tabpager_core::{Appearance, ContentUnit};
/// use ratatui::prelude::*;
///
/// struct Notes {
///     visible: bool,
/// }
///
/// impl ContentUnit for Notes {
///     fn appearance(&mut self, phase: Appearance, _animated: bool) {
///         self.visible = phase.is_appearing();
///     }
///     fn render(&self, area: Rect, buf: &mut Buffer) {
///         "notes".render(area, buf);
///     }
/// }
/// ```
pub trait ContentUnit {
    /// Called once the unit has been installed under the container.
    fn attached(&mut self) {}

    /// Called when the unit is removed from the container.
    fn detached(&mut self) {}

    /// Receives an appearance transition.
    fn appearance(&mut self, phase: Appearance, animated: bool);

    /// Renders the unit's content into `area`.
    ///
    /// A page that is partly scrolled out of view is rendered at full size
    /// into an off-screen buffer and then clipped, so `area` is always one
    /// whole page.
    fn render(&self, area: Rect, buf: &mut Buffer);

    /// The unit's vertical scroll content, if it has any.
    fn inner_scroll(&self) -> Option<&dyn InnerScroll> {
        None
    }

    /// Mutable access to the unit's vertical scroll content.
    fn inner_scroll_mut(&mut self) -> Option<&mut dyn InnerScroll> {
        None
    }
}

/// Externally supplied view shown above the tab strip.
pub trait HeaderView {
    /// Height of the header in layout units
    fn height(&self) -> f64;

    /// Renders the header at its full height into `area`.
    fn render(&self, area: Rect, buf: &mut Buffer);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scroller {
        offset: f64,
        enabled: bool,
    }

    impl InnerScroll for Scroller {
        fn offset(&self) -> f64 {
            self.offset
        }

        fn set_offset(&mut self, offset: f64) {
            self.offset = offset;
        }

        fn content_height(&self) -> f64 {
            500.0
        }

        fn set_scroll_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
        }
    }

    struct TestUnit {
        phases: Vec<Appearance>,
        scroll: Option<Scroller>,
    }

    impl ContentUnit for TestUnit {
        fn appearance(&mut self, phase: Appearance, _animated: bool) {
            self.phases.push(phase);
        }

        fn render(&self, _area: Rect, _buf: &mut Buffer) {}

        fn inner_scroll(&self) -> Option<&dyn InnerScroll> {
            self.scroll.as_ref().map(|s| s as &dyn InnerScroll)
        }

        fn inner_scroll_mut(&mut self) -> Option<&mut dyn InnerScroll> {
            self.scroll.as_mut().map(|s| s as &mut dyn InnerScroll)
        }
    }

    #[test]
    fn test_string_titles() {
        assert_eq!(String::from("Inbox").title(), "Inbox");
        assert_eq!("Archive".title(), "Archive");
    }

    #[test]
    fn test_unit_defaults_have_no_scroll() {
        struct Plain;
        impl ContentUnit for Plain {
            fn appearance(&mut self, _phase: Appearance, _animated: bool) {}
            fn render(&self, _area: Rect, _buf: &mut Buffer) {}
        }
        let mut unit = Plain;
        unit.attached();
        unit.detached();
        assert!(unit.inner_scroll().is_none());
        assert!(unit.inner_scroll_mut().is_none());
    }

    #[test]
    fn test_inner_scroll_through_trait_object() {
        let mut unit: Box<dyn ContentUnit> = Box::new(TestUnit {
            phases: Vec::new(),
            scroll: Some(Scroller {
                offset: 0.0,
                enabled: true,
            }),
        });

        if let Some(scroll) = unit.inner_scroll_mut() {
            scroll.set_offset(42.0);
            scroll.set_scroll_enabled(false);
        }
        let scroll = unit.inner_scroll().expect("unit has scroll content");
        assert_eq!(scroll.offset(), 42.0);
        assert_eq!(scroll.content_height(), 500.0);
    }

    #[test]
    fn test_appearance_recorded() {
        let mut unit = TestUnit {
            phases: Vec::new(),
            scroll: None,
        };
        unit.appearance(Appearance::WillAppear, true);
        unit.appearance(Appearance::DidAppear, true);
        assert_eq!(unit.phases, vec![Appearance::WillAppear, Appearance::DidAppear]);
    }
}
