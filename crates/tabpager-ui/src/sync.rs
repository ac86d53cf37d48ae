//! Selection and offset synchronization
//!
//! Maps the paged content's horizontal offset to the tab strip: which page
//! is current and how far the next one has slid in, where the selection
//! indicator sits and how wide it is, and how far the strip itself has
//! auto-scrolled to keep up.
//!
//! Everything here is a pure function of its inputs. The controller calls
//! [`synchronize`] on every paging scroll and after every relayout.

use tabpager_core::physics::lerp;
use tabpager_core::ScrollSignal;

use crate::strip::TabStripModel;

/// Current page and how far towards the next page the content has moved.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollFraction {
    pub page_index: usize,
    /// Fraction of a page in `[0, 1)`
    pub page_fraction: f64,
}

impl ScrollFraction {
    /// Splits `offset` into whole pages and the remainder.
    ///
    /// A non-positive page width or a negative offset yields page 0 with
    /// no fraction.
    pub fn from_offset(offset: f64, page_width: f64) -> Self {
        if page_width <= 0.0 || !page_width.is_finite() || offset.is_nan() || offset <= 0.0 {
            return ScrollFraction::default();
        }
        let pages = (offset / page_width).floor();
        // remainder taken against the floored page so both agree
        let fraction = (offset - pages * page_width) / page_width;
        ScrollFraction {
            page_index: pages as usize,
            page_fraction: fraction.clamp(0.0, 1.0),
        }
    }

    /// Offset this fraction corresponds to for `page_width`.
    pub fn offset(&self, page_width: f64) -> f64 {
        (self.page_index as f64 + self.page_fraction) * page_width
    }
}

/// Position and width of the selection indicator along the strip.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndicatorGeometry {
    /// Distance from the separator's leading edge, never negative
    pub leading: f64,
    pub width: f64,
}

/// Strip metrics the synchronizer needs besides the scroll signal.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StripMetrics {
    /// Visible width of the strip
    pub available_width: f64,
    pub inset: f64,
    pub spacing: f64,
}

/// Everything derived from one scroll signal.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SyncFrame {
    pub fraction: ScrollFraction,
    pub indicator: IndicatorGeometry,
    /// Horizontal scroll offset of the strip's own content
    pub strip_offset: f64,
}

/// Auto-scroll offset that keeps the strip proportional to the content.
///
/// Zero whenever either range is empty.
pub fn strip_offset(signal: &ScrollSignal, strip_content_width: f64, strip_viewport_width: f64) -> f64 {
    let content_range = signal.scroll_range();
    if content_range <= 0.0 {
        return 0.0;
    }
    let strip_range = (strip_content_width - strip_viewport_width).max(0.0);
    strip_range * signal.offset / content_range
}

/// Derives indicator geometry and strip auto-scroll from a paging offset.
pub fn synchronize<M>(strip: &TabStripModel<M>, signal: &ScrollSignal, metrics: &StripMetrics) -> SyncFrame {
    let StripMetrics {
        available_width,
        inset,
        spacing,
    } = *metrics;

    let fraction = ScrollFraction::from_offset(signal.offset, signal.viewport_width);
    let width_at = |index: usize| strip.layout_width(index, available_width, inset, spacing);

    let strip_content_width = strip.content_width(available_width, inset, spacing);
    let strip_offset = strip_offset(signal, strip_content_width, available_width);

    let preceding: f64 = (0..fraction.page_index).map(&width_at).sum();
    let current = width_at(fraction.page_index);
    let next = width_at(fraction.page_index + 1);

    let leading = preceding + fraction.page_fraction * current - strip_offset;
    let width = lerp(current, next, fraction.page_fraction);

    SyncFrame {
        fraction,
        indicator: IndicatorGeometry {
            leading: leading.max(0.0),
            width: width.max(0.0),
        },
        strip_offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strip::WidthFn;
    use proptest::prelude::*;

    fn fixed_widths() -> WidthFn<&'static str> {
        Box::new(|title: &&'static str| match *title {
            "A" => 40.0,
            "B" => 60.0,
            "C" => 50.0,
            "D" => 70.0,
            "E" => 45.0,
            _ => 0.0,
        })
    }

    fn five_tabs() -> TabStripModel<&'static str> {
        let mut strip = TabStripModel::new(fixed_widths());
        strip.set_models(vec!["A", "B", "C", "D", "E"]);
        strip
    }

    #[test]
    fn test_fraction_mid_page() {
        let fraction = ScrollFraction::from_offset(480.0, 320.0);
        assert_eq!(fraction.page_index, 1);
        assert!((fraction.page_fraction - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_fraction_degenerate_width() {
        assert_eq!(ScrollFraction::from_offset(480.0, 0.0), ScrollFraction::default());
        assert_eq!(ScrollFraction::from_offset(-10.0, 320.0), ScrollFraction::default());
    }

    #[test]
    fn test_natural_mode_mid_page() {
        let strip = five_tabs();
        let signal = ScrollSignal::new(480.0, 320.0, 1600.0);
        let metrics = StripMetrics {
            available_width: 250.0,
            inset: 16.0,
            spacing: 0.0,
        };
        let frame = synchronize(&strip, &signal, &metrics);

        assert_eq!(frame.fraction.page_index, 1);
        assert!((frame.fraction.page_fraction - 0.5).abs() < 1e-12);
        assert!((frame.indicator.width - 55.0).abs() < 1e-9);

        // strip content 265 + 32 = 297, range 47 over content range 1280
        let expected_strip = 47.0 * 480.0 / 1280.0;
        assert!((frame.strip_offset - expected_strip).abs() < 1e-9);
        let expected_leading = 40.0 + 0.5 * 60.0 - expected_strip;
        assert!((frame.indicator.leading - expected_leading).abs() < 1e-9);
    }

    #[test]
    fn test_fill_mode_indicator_slides_evenly() {
        let strip = five_tabs();
        let signal = ScrollSignal::new(480.0, 320.0, 1600.0);
        let metrics = StripMetrics {
            available_width: 400.0,
            inset: 16.0,
            spacing: 8.0,
        };
        let frame = synchronize(&strip, &signal, &metrics);

        assert!((frame.indicator.width - 73.6).abs() < 1e-9);
        assert_eq!(frame.strip_offset, 0.0);
        assert!((frame.indicator.leading - 1.5 * 73.6).abs() < 1e-9);
    }

    #[test]
    fn test_zero_content_range_gives_zero_strip_offset() {
        let strip = five_tabs();
        let signal = ScrollSignal::new(0.0, 320.0, 320.0);
        let metrics = StripMetrics {
            available_width: 100.0,
            inset: 0.0,
            spacing: 0.0,
        };
        let frame = synchronize(&strip, &signal, &metrics);
        assert_eq!(frame.strip_offset, 0.0);
        assert_eq!(frame.indicator.leading, 0.0);
        assert_eq!(frame.indicator.width, 40.0);
    }

    #[test]
    fn test_leading_clamped_at_zero() {
        let strip = five_tabs();
        // Strip range far larger than the content range pushes leading negative
        let signal = ScrollSignal::new(10.0, 320.0, 340.0);
        let metrics = StripMetrics {
            available_width: 20.0,
            inset: 0.0,
            spacing: 0.0,
        };
        let frame = synchronize(&strip, &signal, &metrics);
        assert!(frame.strip_offset > 0.0);
        assert_eq!(frame.indicator.leading, 0.0);
    }

    #[test]
    fn test_empty_strip_is_safe() {
        let strip: TabStripModel<&'static str> = TabStripModel::new(fixed_widths());
        let signal = ScrollSignal::new(0.0, 0.0, 0.0);
        let frame = synchronize(&strip, &signal, &StripMetrics::default());
        assert_eq!(frame, SyncFrame::default());
    }

    proptest! {
        #[test]
        fn prop_fraction_round_trip(
            page_width in 1.0f64..2000.0,
            pages in 1usize..20,
            position in 0.0f64..1.0,
        ) {
            let max_offset = page_width * (pages - 1) as f64;
            let offset = max_offset * position;
            let fraction = ScrollFraction::from_offset(offset, page_width);
            prop_assert!(fraction.page_fraction >= 0.0 && fraction.page_fraction < 1.0 + 1e-12);
            prop_assert!((fraction.offset(page_width) - offset).abs() < 1e-6);
        }

        #[test]
        fn prop_indicator_never_negative(offset in 0.0f64..1280.0, available in 0.0f64..600.0) {
            let strip = five_tabs();
            let signal = ScrollSignal::new(offset, 320.0, 1600.0);
            let metrics = StripMetrics { available_width: available, inset: 16.0, spacing: 8.0 };
            let frame = synchronize(&strip, &signal, &metrics);
            prop_assert!(frame.indicator.leading >= 0.0);
            prop_assert!(frame.indicator.width >= 0.0);
        }
    }
}
